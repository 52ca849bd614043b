pub mod clients;
pub mod commands;
pub mod commit;
pub mod config;
pub mod fixture_dir;
pub mod fixtures;
pub mod parse;

mod app;
mod logging;

pub use app::App;
pub use clients::git::GitClient;
pub use commit::Commit;
pub use commit::CommitId;
pub use config::Config;
pub use fixture_dir::FixtureDir;
pub use fixtures::Repo;
pub use fixtures::git_repo;
pub use logging::setup_logging;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}

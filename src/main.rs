use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use git_fixtures::App;
use git_fixtures::Config;

#[derive(Parser)]
#[command(name = "git-fixtures")]
#[command(about = "Create and inspect throwaway git repositories for tests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a fixture repository and keep it on disk
    Repo {
        /// Back the working copy with a bare remote and clone it shallowly
        #[arg(long)]
        remote: bool,
        /// Branch to check out (defaults to the configured branch)
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Create empty commits, one per message
    Commit {
        /// Repository to operate on
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
        #[arg(short, long, required = true)]
        message: Vec<String>,
    },
    /// Show commits reachable from HEAD
    Log {
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
        /// Exclude commits reachable from this ref
        #[arg(long)]
        from: Option<String>,
        /// Print commits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the HEAD commit, locally or of a remote
    Head {
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
        /// Remote URL to query instead of the working copy
        #[arg(long)]
        remote: Option<String>,
    },
    /// List files staged for addition
    Staged {
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
    },
    /// List files changed by a commit
    Files {
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
        #[arg(default_value = "HEAD")]
        reference: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    git_fixtures::setup_logging()?;
    let app = App::new(Config::load()?);

    let cli = Cli::parse();
    let stdout = &mut std::io::stdout();

    match cli.command {
        Commands::Repo { remote, branch } => app.cmd_repo(remote, branch.as_deref(), stdout).await?,
        Commands::Commit { dir, message } => app.cmd_commit(&dir, &message, stdout).await?,
        Commands::Log { dir, from, json } => {
            app.cmd_log(&dir, from.as_deref(), json, stdout).await?
        }
        Commands::Head { dir, remote } => app.cmd_head(&dir, remote.as_deref(), stdout).await?,
        Commands::Staged { dir } => app.cmd_staged(&dir, stdout).await?,
        Commands::Files { dir, reference } => app.cmd_files(&dir, &reference, stdout).await?,
    }

    Ok(())
}

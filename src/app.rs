use std::path::Path;

use crate::clients::git::GitClient;
use crate::config::Config;

/// Entry point for the `git-fixtures` commands.
pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub(crate) fn client(&self, dir: &Path) -> GitClient {
        GitClient::new(dir, &self.config)
    }
}

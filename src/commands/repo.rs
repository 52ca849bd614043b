use colored::Colorize;

use crate::App;
use crate::Config;
use crate::fixtures::git_repo;

impl App {
    /// Create a fixture repository and leave it on disk.
    pub async fn cmd_repo(
        &self,
        remote: bool,
        branch: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        let config = Config {
            keep_dirs: true,
            ..self.config.clone()
        };
        let branch = branch.unwrap_or(&config.default_branch);
        let repo = git_repo(&config, remote, branch).await?;
        let repository_url = repo.repository_url().to_string();
        let (path, remote_path) = repo.keep();

        writeln!(stdout, "{} {}", "working copy:".bold(), path.display())?;
        if let Some(remote_path) = remote_path {
            writeln!(stdout, "{} {}", "remote:".bold(), remote_path.display())?;
        }
        writeln!(stdout, "{} {}", "url:".bold(), repository_url)?;
        Ok(())
    }
}

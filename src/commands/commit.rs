use std::path::Path;

use colored::Colorize;

use crate::App;

impl App {
    /// Create one empty commit per message.
    pub async fn cmd_commit(
        &self,
        dir: &Path,
        messages: &[String],
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        let messages: Vec<&str> = messages.iter().map(String::as_str).collect();
        let commits = self.client(dir).commits(&messages).await?;
        for commit in commits {
            writeln!(stdout, "{} {}", commit.hash.short().yellow(), commit.title())?;
        }
        Ok(())
    }
}

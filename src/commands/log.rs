use std::path::Path;

use colored::Colorize;

use crate::App;

impl App {
    /// Print the commits reachable from `HEAD`, back to `from` exclusive.
    pub async fn cmd_log(
        &self,
        dir: &Path,
        from: Option<&str>,
        json: bool,
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        let commits = self.client(dir).get_commits(from).await?;

        if json {
            serde_json::to_writer_pretty(&mut *stdout, &commits)?;
            writeln!(stdout)?;
            return Ok(());
        }

        for commit in &commits {
            let line = format!(
                "{} {} {} {}",
                commit.hash.short().yellow(),
                commit.committer_date.format("%Y-%m-%d %H:%M"),
                commit.title(),
                commit.git_tags.dimmed()
            );
            writeln!(stdout, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

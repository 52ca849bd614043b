use std::path::Path;

use crate::App;

impl App {
    /// Print the local `HEAD`, or the `HEAD` of `remote` when given.
    pub async fn cmd_head(
        &self,
        dir: &Path,
        remote: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        let git = self.client(dir);
        let head = match remote {
            Some(url) => git.remote_head(url).await?,
            None => git.show_head().await?,
        };
        writeln!(stdout, "{head}")?;
        Ok(())
    }

    pub async fn cmd_staged(
        &self,
        dir: &Path,
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        for file in self.client(dir).staged().await? {
            writeln!(stdout, "{file}")?;
        }
        Ok(())
    }

    /// Print the files changed by `reference`.
    pub async fn cmd_files(
        &self,
        dir: &Path,
        reference: &str,
        stdout: &mut impl std::io::Write,
    ) -> anyhow::Result<()> {
        for file in self.client(dir).committed_files(reference).await? {
            writeln!(stdout, "{file}")?;
        }
        Ok(())
    }
}

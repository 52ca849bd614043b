use std::path::Path;

use git_fixtures::Config;

/// Config used by the integration tests.
///
/// Set `DEBUG_TESTS` to keep the created repositories for inspection.
pub fn config() -> Config {
    Config {
        keep_dirs: std::env::var("DEBUG_TESTS").is_ok(),
        ..Config::default_for_tests()
    }
}

/// Writes `files` (each containing its own name) into `dir`.
pub async fn write_files(dir: &Path, files: &[&str]) -> anyhow::Result<()> {
    for file in files {
        let path = dir.join(file);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, format!("{file}\n")).await?;
    }
    Ok(())
}

/// Reads the raw contents of `.git/HEAD`.
pub async fn read_head_file(dir: &Path) -> anyhow::Result<String> {
    Ok(tokio::fs::read_to_string(dir.join(".git").join("HEAD"))
        .await?
        .trim()
        .to_string())
}

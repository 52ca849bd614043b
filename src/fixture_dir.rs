use std::path::Path;
use std::path::PathBuf;

use tracing::info;

/// A scratch directory holding one fixture repository.
///
/// Removed from disk when dropped, unless it was created with `keep`, in
/// which case it is left for inspection and its location is logged.
#[derive(Debug)]
pub enum FixtureDir {
    Temp(tempfile::TempDir),
    Kept(PathBuf),
}

impl FixtureDir {
    pub fn new(keep: bool) -> std::io::Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("git-fixture-").tempdir()?;

        if keep {
            let path = temp_dir.keep();
            info!(path = %path.display(), "fixture directory kept");
            Ok(FixtureDir::Kept(path))
        } else {
            Ok(FixtureDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FixtureDir::Temp(t) => t.path(),
            FixtureDir::Kept(p) => p.as_path(),
        }
    }

    /// Persist the directory and return its path.
    pub fn keep(self) -> PathBuf {
        match self {
            FixtureDir::Temp(t) => t.keep(),
            FixtureDir::Kept(p) => p,
        }
    }

    pub fn file_url(&self) -> String {
        file_url(self.path())
    }
}

/// `file://` URL for a local path, usable as a git remote.
pub fn file_url(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

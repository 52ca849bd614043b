//! Constructors for fixture repositories.
//!
//! Each function creates fresh scratch directories, so fixtures never share
//! state and tests using them may run concurrently.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use tracing::instrument;

use crate::Config;
use crate::clients::git::GitClient;
use crate::fixture_dir::FixtureDir;

/// Message of the commit seeding a new bare remote.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// A fixture repository: a working copy and, when remote-backed, the bare
/// repository it was cloned from.
///
/// Dropping the handle removes both directories unless they are kept.
#[derive(Debug)]
pub struct Repo {
    dir: FixtureDir,
    remote: Option<FixtureDir>,
    repository_url: String,
    config: Config,
}

impl Repo {
    /// Working directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// File URL of the directory the fixture was initialized in: the bare
    /// remote when there is one, otherwise the working directory itself.
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn remote_path(&self) -> Option<&Path> {
        self.remote.as_ref().map(FixtureDir::path)
    }

    pub fn client(&self) -> GitClient {
        GitClient::new(self.path(), &self.config)
    }

    /// Persist the directories and return the working and remote paths.
    pub fn keep(self) -> (PathBuf, Option<PathBuf>) {
        (self.dir.keep(), self.remote.map(FixtureDir::keep))
    }
}

fn scratch_dir(config: &Config) -> Result<FixtureDir> {
    FixtureDir::new(config.keep_dirs).context("Failed to create fixture directory")
}

/// Create a repository with `branch` checked out.
///
/// With `with_remote`, a bare repository is created and seeded with one
/// commit, and the returned working copy is a depth-1 clone of it.
#[instrument(skip(config))]
pub async fn git_repo(config: &Config, with_remote: bool, branch: &str) -> Result<Repo> {
    let init_dir = scratch_dir(config)?;
    let init_git = GitClient::new(init_dir.path(), config);
    init_git.init(with_remote).await?;
    if with_remote {
        // Point the bare HEAD at `branch` regardless of init.defaultBranch.
        init_git
            .git(["symbolic-ref", "HEAD", &format!("refs/heads/{branch}")])
            .await?;
    }
    let repository_url = init_dir.file_url();

    let (dir, remote) = if with_remote {
        init_bare_repo(config, &repository_url, branch).await?;
        let clone = shallow_clone(config, &repository_url, branch, 1).await?;
        (clone, Some(init_dir))
    } else {
        init_git.checkout(branch, true).await?;
        (init_dir, None)
    };

    GitClient::new(dir.path(), config)
        .git(["config", "commit.gpgsign", "false"])
        .await?;

    Ok(Repo {
        dir,
        remote,
        repository_url,
        config: config.clone(),
    })
}

/// Give an empty bare repository a `branch` holding a single empty commit.
#[instrument(skip(config))]
pub async fn init_bare_repo(config: &Config, repository_url: &str, branch: &str) -> Result<()> {
    let dir = scratch_dir(config)?;
    let git = GitClient::new(dir.path(), config);
    git.git([
        "clone",
        "--no-hardlinks",
        repository_url,
        &dir.path().to_string_lossy(),
    ])
    .await?;
    git.checkout(branch, true).await?;
    git.commits(&[INITIAL_COMMIT_MESSAGE]).await?;
    git.git(["push", repository_url, branch]).await?;
    Ok(())
}

/// Clone only `branch`, without tags, truncated to `depth` commits.
#[instrument(skip(config))]
pub async fn shallow_clone(
    config: &Config,
    repository_url: &str,
    branch: &str,
    depth: u32,
) -> Result<FixtureDir> {
    let dir = scratch_dir(config)?;
    GitClient::new(dir.path(), config)
        .git([
            "clone",
            "--no-hardlinks",
            "--no-tags",
            "-b",
            branch,
            "--depth",
            &depth.to_string(),
            repository_url,
            &dir.path().to_string_lossy(),
        ])
        .await?;
    Ok(dir)
}

/// Fetch `repository_url` into a new repository and check out `head`,
/// leaving `HEAD` detached.
#[instrument(skip(config))]
pub async fn detached_head(config: &Config, repository_url: &str, head: &str) -> Result<FixtureDir> {
    let dir = scratch_dir(config)?;
    let git = GitClient::new(dir.path(), config);
    git.init(false).await?;
    git.remote_add("origin", repository_url).await?;
    git.fetch(repository_url).await?;
    git.checkout(head, false).await?;
    Ok(dir)
}

/// Like [`detached_head`], but resets a local `branch` to `head`, as CI
/// checkouts of a specific commit do.
#[instrument(skip(config))]
pub async fn detached_head_from_branch(
    config: &Config,
    repository_url: &str,
    branch: &str,
    head: &str,
) -> Result<FixtureDir> {
    let dir = scratch_dir(config)?;
    let git = GitClient::new(dir.path(), config);
    git.init(false).await?;
    git.remote_add("origin", repository_url).await?;
    git.git([
        "fetch",
        "--force",
        repository_url,
        &format!("{branch}:remotes/origin/{branch}"),
    ])
    .await?;
    git.git(["reset", "--hard", head]).await?;
    git.git(["checkout", "-q", "-B", branch]).await?;
    Ok(dir)
}

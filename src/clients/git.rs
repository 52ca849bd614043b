use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use super::runner::CommandError;
use super::runner::ExecOptions;
use super::runner::GitRunner;
use super::runner::SystemGit;
use crate::Config;
use crate::commit::Commit;
use crate::commit::CommitId;
use crate::parse;

// -----------------------------------------------------------------------------
// Types

/// Git client bound to one working directory.
#[derive(Debug, Clone)]
pub struct GitClient<R = SystemGit> {
    path: PathBuf,
    runner: R,
    notes_ref: String,
    env: BTreeMap<String, String>,
}

// -----------------------------------------------------------------------------
// GitClient impl

impl GitClient<SystemGit> {
    pub fn new(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self::with_runner(path, SystemGit::new(config), &config.notes_ref)
    }
}

impl<R: GitRunner> GitClient<R> {
    pub fn with_runner(path: impl Into<PathBuf>, runner: R, notes_ref: &str) -> Self {
        Self {
            path: path.into(),
            runner,
            notes_ref: notes_ref.to_string(),
            env: BTreeMap::new(),
        }
    }

    /// Override an environment variable for every command run by this client.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn git<I>(&self, args: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let options = ExecOptions {
            cwd: Some(self.path.clone()),
            env: self.env.clone(),
        };
        self.runner.run(args, &options).await
    }

    /// Initialize a repository in the client's directory.
    pub async fn init(&self, bare: bool) -> Result<()> {
        if bare {
            self.git(["init", "--bare"]).await?;
        } else {
            self.git(["init"]).await?;
        }
        Ok(())
    }

    pub async fn remote_add(&self, name: &str, repository_url: &str) -> Result<()> {
        self.git(["remote", "add", name, repository_url]).await?;
        Ok(())
    }

    /// Check out `branch`, creating it first when `create` is set.
    pub async fn checkout(&self, branch: &str, create: bool) -> Result<()> {
        if create {
            self.git(["checkout", "-b", branch]).await?;
        } else {
            self.git(["checkout", branch]).await?;
        }
        Ok(())
    }

    /// Create one empty, unsigned commit per message, in order.
    ///
    /// Returns the created commits newest first.
    pub async fn commits(&self, messages: &[&str]) -> Result<Vec<Commit>> {
        // Each commit's parent is the previous one, so these must not overlap.
        for &message in messages {
            self.git(["commit", "-m", message, "--allow-empty", "--no-gpg-sign"])
                .await?;
        }

        let mut commits = self.get_commits(None).await?;
        commits.truncate(messages.len());
        Ok(commits)
    }

    /// Commits reachable from `HEAD`, excluding those reachable from `from`.
    pub async fn get_commits(&self, from: Option<&str>) -> Result<Vec<Commit>> {
        let range = match from {
            Some(from) => format!("{from}..HEAD"),
            None => "HEAD".to_string(),
        };
        let output = self
            .git(["log", "--no-show-signature", parse::LOG_FORMAT, &range])
            .await?;
        parse::parse_log(&output).with_context(|| format!("Failed to parse git log for {range}"))
    }

    /// Create or move `tag_name`, at `sha` or at `HEAD`.
    pub async fn tag_version(&self, tag_name: &str, sha: Option<&str>) -> Result<()> {
        let mut args = vec!["tag", "-f", tag_name];
        args.extend(sha);
        self.git(args).await?;
        Ok(())
    }

    /// Commit a tag points to.
    pub async fn tag_head(&self, tag_name: &str) -> Result<CommitId> {
        let output = self.git(["rev-list", "-1", tag_name]).await?;
        Ok(CommitId(output.trim().to_string()))
    }

    /// The tag pointing exactly at `sha`, if any.
    pub async fn commit_tag(&self, sha: &str) -> Result<Option<String>> {
        match self.git(["describe", "--tags", "--exact-match", sha]).await {
            Ok(output) => Ok(Some(output.trim().to_string())),
            Err(err)
                if matches!(
                    err.downcast_ref::<CommandError>(),
                    Some(CommandError::Failed { .. })
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Push `HEAD` and all tags to `branch` on the remote.
    pub async fn push(&self, repository_url: &str, branch: &str) -> Result<()> {
        self.git(["push", "--tags", repository_url, &format!("HEAD:{branch}")])
            .await?;
        Ok(())
    }

    pub async fn fetch(&self, repository_url: &str) -> Result<()> {
        self.git(["fetch", repository_url]).await?;
        Ok(())
    }

    pub async fn head(&self) -> Result<CommitId> {
        let output = self.git(["rev-parse", "HEAD"]).await?;
        Ok(CommitId(output.trim().to_string()))
    }

    /// `HEAD` of the local working copy, read from `git show`.
    pub async fn show_head(&self) -> Result<CommitId> {
        let output = self.git(["show", "HEAD", "--quiet", "--no-color"]).await?;
        Ok(parse::parse_show_head(&output)?)
    }

    /// `HEAD` of a remote, read from `git ls-remote`.
    pub async fn remote_head(&self, repository_url: &str) -> Result<CommitId> {
        let output = self.git(["ls-remote", repository_url, "HEAD"]).await?;
        parse::parse_first_sha(&output)?
            .with_context(|| format!("Remote {repository_url} has no HEAD"))
    }

    /// Commit `tag_name` points to on a remote, if the tag exists there.
    pub async fn remote_tag_head(
        &self,
        repository_url: &str,
        tag_name: &str,
    ) -> Result<Option<CommitId>> {
        let output = self
            .git(["ls-remote", "--tags", repository_url, tag_name])
            .await?;
        Ok(parse::parse_first_sha(&output)?)
    }

    /// Paths currently staged for addition.
    pub async fn staged(&self) -> Result<Vec<String>> {
        let output = self.git(["status", "--porcelain"]).await?;
        Ok(parse::parse_staged(&output)?)
    }

    /// Paths changed by the commit at `reference`.
    pub async fn committed_files(&self, reference: &str) -> Result<Vec<String>> {
        let output = self
            .git(["diff-tree", "--no-commit-id", "--name-only", "-r", reference])
            .await?;
        Ok(parse::parse_lines(&output))
    }

    /// Force-stage `files`, skipping any that cannot be added.
    pub async fn add(&self, files: &[&str]) -> Result<()> {
        let mut args = vec!["add", "--force", "--ignore-errors"];
        args.extend_from_slice(files);
        self.git(args).await?;
        Ok(())
    }

    pub async fn add_config(&self, name: &str, value: &str) -> Result<()> {
        self.git(["config", "--add", name, value]).await?;
        Ok(())
    }

    /// Merge `reference` with a merge commit.
    pub async fn merge(&self, reference: &str) -> Result<()> {
        self.git([
            "merge",
            "--no-ff",
            "-m",
            &format!("Merge branch {reference}"),
            reference,
        ])
        .await?;
        Ok(())
    }

    pub async fn merge_ff(&self, reference: &str) -> Result<()> {
        self.git(["merge", "--ff", reference]).await?;
        Ok(())
    }

    pub async fn rebase(&self, reference: &str) -> Result<()> {
        self.git(["rebase", reference]).await?;
        Ok(())
    }

    pub async fn add_note(&self, note: &str, reference: &str) -> Result<()> {
        self.git(["notes", "--ref", &self.notes_ref, "add", "-m", note, reference])
            .await?;
        Ok(())
    }

    pub async fn get_note(&self, reference: &str) -> Result<String> {
        let output = self
            .git(["notes", "--ref", &self.notes_ref, "show", reference])
            .await?;
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::clients::runner::MockGitRunner;

    const SHA_A: &str = "1111111111111111111111111111111111111111";
    const SHA_B: &str = "2222222222222222222222222222222222222222";

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    fn client(runner: MockGitRunner) -> GitClient<MockGitRunner> {
        GitClient::with_runner("/repo", runner, "fixtures")
    }

    fn log_output() -> String {
        format!(
            "{SHA_B}\x1fSecond\n\x1f (HEAD -> master)\x1f2024-01-02T00:00:00Z\x1e\n\
             {SHA_A}\x1fFirst\n\x1f\x1f2024-01-01T00:00:00Z\x1e\n"
        )
    }

    #[tokio::test]
    async fn test_checkout_args() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .with(eq(args(&["checkout", "-b", "next"])), eq(ExecOptions::in_dir("/repo")))
            .times(1)
            .returning(|_, _| Ok(String::new()));
        runner
            .expect_run()
            .with(eq(args(&["checkout", "master"])), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let git = client(runner);
        git.checkout("next", true).await?;
        git.checkout("master", false).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_commits_in_order_then_log() -> Result<()> {
        let mut seq = Sequence::new();
        let mut runner = MockGitRunner::new();
        for message in ["First", "Second"] {
            runner
                .expect_run()
                .with(
                    eq(args(&["commit", "-m", message, "--allow-empty", "--no-gpg-sign"])),
                    mockall::predicate::always(),
                )
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(String::new()));
        }
        runner
            .expect_run()
            .withf(|args, _| args[0] == "log" && args.last().map(String::as_str) == Some("HEAD"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(log_output()));

        let commits = client(runner).commits(&["First", "Second"]).await?;
        let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["Second", "First"]);
        assert_eq!(commits[0].git_tags, "(HEAD -> master)");
        Ok(())
    }

    #[tokio::test]
    async fn test_commits_truncates_to_message_count() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .withf(|args, _| args[0] == "commit")
            .times(1)
            .returning(|_, _| Ok(String::new()));
        runner
            .expect_run()
            .withf(|args, _| args[0] == "log")
            .returning(|_, _| Ok(log_output()));

        let commits = client(runner).commits(&["Second"]).await?;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash.0, SHA_B);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_commits_range_and_env() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .withf(|args, options| {
                args.last().map(String::as_str) == Some("v1.0.0..HEAD")
                    && options.env.get("GIT_TRACE").map(String::as_str) == Some("0")
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let commits = client(runner)
            .with_env("GIT_TRACE", "0")
            .get_commits(Some("v1.0.0"))
            .await?;
        assert!(commits.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_tag_version_args() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .with(eq(args(&["tag", "-f", "v1.0.0", SHA_A])), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(String::new()));
        runner
            .expect_run()
            .with(eq(args(&["tag", "-f", "v2.0.0"])), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let git = client(runner);
        git.tag_version("v1.0.0", Some(SHA_A)).await?;
        git.tag_version("v2.0.0", None).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_push_args() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .with(
                eq(args(&["push", "--tags", "file:///remote", "HEAD:master"])),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _| Ok(String::new()));

        client(runner).push("file:///remote", "master").await
    }

    #[tokio::test]
    async fn test_add_args() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .with(
                eq(args(&["add", "--force", "--ignore-errors", "a.txt", "b.txt"])),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _| Ok(String::new()));

        client(runner).add(&["a.txt", "b.txt"]).await
    }

    #[tokio::test]
    async fn test_remote_head() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(format!("{SHA_A}\tHEAD\n")));

        let head = client(runner).remote_head("file:///remote").await?;
        assert_eq!(head.0, SHA_A);
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_head_empty_remote_is_error() {
        let mut runner = MockGitRunner::new();
        runner.expect_run().returning(|_, _| Ok(String::new()));

        let err = client(runner).remote_head("file:///remote").await.unwrap_err();
        assert!(err.to_string().contains("has no HEAD"));
    }

    #[tokio::test]
    async fn test_show_head_garbage_is_parse_error() {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok("not a commit".to_string()));

        let err = client(runner).show_head().await.unwrap_err();
        assert!(err.downcast_ref::<parse::ParseError>().is_some());
    }

    #[tokio::test]
    async fn test_commit_tag_untagged_is_none() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner.expect_run().returning(|args, _| {
            Err(CommandError::Failed {
                command: format!("git {}", args.join(" ")),
                code: Some(128),
                stderr: "fatal: no tag exactly matches".to_string(),
            }
            .into())
        });

        assert_eq!(client(runner).commit_tag(SHA_A).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_commit_tag_spawn_failure_propagates() {
        let mut runner = MockGitRunner::new();
        runner.expect_run().returning(|_, _| {
            Err(CommandError::Spawn {
                command: "git describe".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }
            .into())
        });

        assert!(client(runner).commit_tag(SHA_A).await.is_err());
    }

    #[tokio::test]
    async fn test_notes_use_configured_ref() -> Result<()> {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .with(
                eq(args(&["notes", "--ref", "fixtures", "add", "-m", "{}", "HEAD"])),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _| Ok(String::new()));
        runner
            .expect_run()
            .with(
                eq(args(&["notes", "--ref", "fixtures", "show", "HEAD"])),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _| Ok("{}\n".to_string()));

        let git = client(runner);
        git.add_note("{}", "HEAD").await?;
        assert_eq!(git.get_note("HEAD").await?, "{}");
        Ok(())
    }
}

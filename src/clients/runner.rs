#![allow(async_fn_in_trait)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::Config;

// -----------------------------------------------------------------------------
// Types

/// Per-invocation options: where to run and which variables to override on
/// top of the inherited host environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

/// Errors raised by a single git invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The git binary could not be spawned.
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The git command exited with a non-zero status.
    #[error("`{command}` failed (exit code {code:?}): {stderr}")]
    Failed {
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },
}

// -----------------------------------------------------------------------------
// GitRunner trait

/// Runs one git invocation and returns its raw stdout.
#[cfg_attr(test, automock)]
pub trait GitRunner {
    async fn run(&self, args: Vec<String>, options: &ExecOptions) -> Result<String>;
}

// -----------------------------------------------------------------------------
// SystemGit

/// Real implementation that calls the git CLI
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: String,
    env: BTreeMap<String, String>,
}

impl SystemGit {
    pub fn new(config: &Config) -> Self {
        Self {
            binary: config.git_binary.clone(),
            env: config.identity_env(),
        }
    }
}

impl ExecOptions {
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(path.into()),
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl GitRunner for SystemGit {
    async fn run(&self, args: Vec<String>, options: &ExecOptions) -> Result<String> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!(%command, cwd = ?options.cwd, "running git");

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .envs(&self.env)
            .envs(&options.env)
            .stdin(Stdio::null());
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await.map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("`{command}` produced non-UTF-8 output"))
    }
}

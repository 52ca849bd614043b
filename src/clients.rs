//! Clients for the `git` executable.
//!
//! - [`runner`]: spawns a single git process and maps failures to [`runner::CommandError`]
//! - [`git`]: per-repository operations (commits, log, tags, push, inspection)
//!
//! The runner sits behind the [`runner::GitRunner`] trait so the argument
//! vectors built by [`git::GitClient`] can be checked without a real git.

pub mod git;
pub mod runner;

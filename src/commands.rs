//! Subcommands of the `git-fixtures` binary, implemented on [`crate::App`].

mod commit;
mod inspect;
mod log;
mod repo;

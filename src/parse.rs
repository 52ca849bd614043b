//! Parsers for line-oriented git output.
//!
//! Every parser returns a [`ParseError`] instead of panicking when the output
//! does not have the expected shape.

use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use thiserror::Error;

use crate::commit::Commit;
use crate::commit::CommitId;

/// Separates fields within a `git log` record.
pub const FIELD_SEPARATOR: char = '\x1f';
/// Terminates a `git log` record.
pub const RECORD_SEPARATOR: char = '\x1e';

/// `--format` argument matching [`parse_log`]: hash, raw body, decoration,
/// strict ISO committer date.
pub const LOG_FORMAT: &str = "--format=%H%x1f%B%x1f%d%x1f%cI%x1e";

static HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<head>\S+)").expect("valid regex"));
static SHOW_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^commit\s+(?<head>[0-9a-f]{7,64})").expect("valid regex"));
static STAGED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^A\s+(?<file>.+)$").expect("valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} fields in log record, got {found}: {record:?}")]
    MissingField {
        expected: usize,
        found: usize,
        record: String,
    },

    #[error("invalid committer date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("no {what} found in output: {output:?}")]
    NoMatch { what: &'static str, output: String },
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub fn parse_log(output: &str) -> Result<Vec<Commit>, ParseError> {
    let mut commits = Vec::new();

    for record in output.split(RECORD_SEPARATOR) {
        let record = record.trim();
        if record.is_empty() {
            continue;
        }

        let parts: Vec<&str> = record.splitn(4, FIELD_SEPARATOR).collect();
        let [hash, message, git_tags, date] = parts[..] else {
            return Err(ParseError::MissingField {
                expected: 4,
                found: parts.len(),
                record: record.to_string(),
            });
        };

        let date = date.trim();
        let committer_date =
            DateTime::parse_from_rfc3339(date).map_err(|source| ParseError::InvalidDate {
                value: date.to_string(),
                source,
            })?;

        commits.push(Commit {
            hash: CommitId(hash.trim().to_string()),
            message: message.trim().to_string(),
            git_tags: git_tags.trim().to_string(),
            committer_date,
        });
    }

    Ok(commits)
}

/// Leading object id of the first non-empty line, as printed by `ls-remote`.
pub fn parse_first_sha(output: &str) -> Result<Option<CommitId>, ParseError> {
    let Some(line) = output.lines().find(|line| !line.trim().is_empty()) else {
        return Ok(None);
    };
    HEAD_RE
        .captures(line)
        .map(|caps| Some(CommitId(caps["head"].to_string())))
        .ok_or_else(|| ParseError::NoMatch {
            what: "object id",
            output: output.to_string(),
        })
}

/// Commit id from the `commit <sha>` header of `git show`.
pub fn parse_show_head(output: &str) -> Result<CommitId, ParseError> {
    SHOW_HEAD_RE
        .captures(output)
        .map(|caps| CommitId(caps["head"].to_string()))
        .ok_or_else(|| ParseError::NoMatch {
            what: "commit header",
            output: output.to_string(),
        })
}

/// Paths staged for addition in `git status --porcelain` output.
pub fn parse_staged(output: &str) -> Result<Vec<String>, ParseError> {
    output
        .lines()
        .filter(|line| line.starts_with("A "))
        .map(|line| {
            STAGED_RE
                .captures(line)
                .map(|caps| caps["file"].to_string())
                .ok_or_else(|| ParseError::NoMatch {
                    what: "staged path",
                    output: line.to_string(),
                })
        })
        .collect()
}

/// Non-empty lines, e.g. from `diff-tree --name-only`.
pub fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

use std::fmt::Display;

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl CommitId {
    /// Abbreviated form used in human-readable output.
    pub fn short(&self) -> &str {
        &self.0[..7.min(self.0.len())]
    }
}

/// A commit as read back from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: CommitId,
    /// Full commit message, trimmed.
    pub message: String,
    /// Ref decoration, e.g. `(HEAD -> master, tag: v1.0.0)`, trimmed.
    pub git_tags: String,
    pub committer_date: DateTime<FixedOffset>,
}

impl Commit {
    /// First line of the message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Tag names listed in the decoration.
    pub fn tags(&self) -> Vec<&str> {
        self.git_tags
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(", ")
            .filter_map(|decoration| decoration.strip_prefix("tag: "))
            .collect()
    }
}

use std::collections::BTreeMap;

use anyhow::Result;

/// Branch used when a fixture is created without an explicit branch.
pub const DEFAULT_BRANCH: &str = "master";

/// Notes ref used by `git notes` helpers.
pub const DEFAULT_NOTES_REF: &str = "fixtures";

#[derive(Debug, Clone)]
pub struct Config {
    /// The git executable to invoke.
    pub git_binary: String,
    pub default_branch: String,
    pub user_name: String,
    pub user_email: String,
    pub notes_ref: String,
    /// Leave fixture directories on disk instead of removing them on drop.
    pub keep_dirs: bool,
}

impl Config {
    /// Load config from the environment, falling back to defaults.
    pub fn load() -> Result<Self> {
        Ok(Self::from_vars(|name| std::env::var(name).ok()))
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default_for_tests();
        Self {
            git_binary: var("GIT_FIXTURES_GIT").unwrap_or(defaults.git_binary),
            default_branch: var("GIT_FIXTURES_BRANCH").unwrap_or(defaults.default_branch),
            user_name: var("GIT_FIXTURES_USER_NAME").unwrap_or(defaults.user_name),
            user_email: var("GIT_FIXTURES_USER_EMAIL").unwrap_or(defaults.user_email),
            notes_ref: var("GIT_FIXTURES_NOTES_REF").unwrap_or(defaults.notes_ref),
            keep_dirs: var("DEBUG_TESTS").is_some(),
        }
    }

    /// Create a new config with explicit identity values.
    pub fn new(user_name: String, user_email: String) -> Self {
        Self {
            user_name,
            user_email,
            ..Self::default_for_tests()
        }
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            git_binary: "git".to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            user_name: "Test User".to_string(),
            user_email: "test@example.com".to_string(),
            notes_ref: DEFAULT_NOTES_REF.to_string(),
            keep_dirs: false,
        }
    }

    /// Environment applied to every git invocation so commits never depend
    /// on the host's global identity.
    pub fn identity_env(&self) -> BTreeMap<String, String> {
        [
            ("GIT_AUTHOR_NAME", &self.user_name),
            ("GIT_AUTHOR_EMAIL", &self.user_email),
            ("GIT_COMMITTER_NAME", &self.user_name),
            ("GIT_COMMITTER_EMAIL", &self.user_email),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_for_tests()
    }
}

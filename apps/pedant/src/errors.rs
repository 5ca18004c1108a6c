//! Error types for configuration, matching, and input loading.
//!
//! Ordering violations are not errors: they are reported through
//! `check::OrderReport`. Everything here aborts the rule (or the run) it
//! was raised in.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PedantError>;

/// Raised while turning configuration into orderings. Never raised during
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown ordering element '{name}' (expected one of: {})", .available.join(", "))]
    UnknownElement {
        name: String,
        available: Vec<String>,
    },
    #[error("ordering element '{0}' is listed more than once")]
    DuplicateElement(String),
    #[error("ordering sequence is empty")]
    EmptyOrdering,
    #[error("setting '{key}' does not apply to rule '{rule}'")]
    UnsupportedSetting { rule: String, key: String },
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("unsupported output mode '{0}' (expected human|json)")]
    UnsupportedOutput(String),
}

/// A declared item that has no counterpart in the resolved collection.
///
/// Carries a rendering of the unmatched item and of the whole superset so
/// the failure can be diagnosed without re-running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchError {
    pub item: String,
    pub superset: Vec<String>,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not match '{}' against any of [{}]",
            self.item,
            self.superset.join(", ")
        )
    }
}

impl std::error::Error for MatchError {}

/// Umbrella error for library entry points. Match failures are not part
/// of it: they are per-rule outcomes, reported next to ordering results.
#[derive(Debug, Error)]
pub enum PedantError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path} is not a valid project snapshot: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad snapshot pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_error_lists_superset() {
        let err = MatchError {
            item: "a:b".into(),
            superset: vec!["c:d".into(), "e:f".into()],
        };
        assert_eq!(
            err.to_string(),
            "could not match 'a:b' against any of [c:d, e:f]"
        );
    }

    #[test]
    fn test_unknown_element_mentions_alternatives() {
        let err = ConfigError::UnknownElement {
            name: "version".into(),
            available: vec!["groupId".into(), "artifactId".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'version'"));
        assert!(msg.contains("groupId, artifactId"));
    }
}

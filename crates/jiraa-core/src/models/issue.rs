//! Issue key and presented summary

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-supplied issue key. Only non-emptiness is checked here; the tracker
/// decides whether the key exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::Validation("Issue key cannot be empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flattened view of an issue, ready to be rendered into chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub key: String,
    pub url: String,
    pub title: String,
    pub status_name: String,
    pub status_color: String,
    pub priority_name: String,
    pub type_name: String,
    pub assignee_name: String,
    pub avatar_url: String,
}

impl IssueSummary {
    /// Author line shown on the chat attachment
    pub fn headline(&self) -> String {
        format!("{}: {}", self.key, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_key_rejects_blank() {
        assert!(IssueKey::new("").is_err());
        assert!(IssueKey::new("  ").is_err());
    }

    #[test]
    fn test_issue_key_is_opaque() {
        let key = IssueKey::new("not a real key!").unwrap();
        assert_eq!(key.as_str(), "not a real key!");
        assert_eq!(key.to_string(), "not a real key!");
    }
}

//! Tracker credentials

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL and API token used for a single lookup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub base_url: String,
    pub token: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Base URL without trailing slashes
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Human-facing link to an issue
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base(), key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_url_trims_trailing_slash() {
        let creds = Credentials::new("https://example.atlassian.net/", "t");
        assert_eq!(
            creds.browse_url("PROJ-1"),
            "https://example.atlassian.net/browse/PROJ-1"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::new("https://example.atlassian.net", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
    }
}

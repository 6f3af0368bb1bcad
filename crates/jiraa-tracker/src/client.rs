//! Issue tracker HTTP client

use jiraa_core::models::{Credentials, IssueKey};
use reqwest::{StatusCode, Url};

use crate::auth::TokenAuth;
use crate::error::{LookupError, Result, UnexpectedCause};
use crate::types::IssuePayload;

const ISSUE_PATH: [&str; 4] = ["rest", "api", "3", "issue"];

/// Looks up single issues. One request per call, no retries.
#[derive(Clone, Default)]
pub struct TrackerClient {
    http: reqwest::Client,
}

impl TrackerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{base}/rest/api/3/issue/{key}` with the key percent-escaped as one
    /// path segment.
    ///
    /// A key of `.` or `..` (escaped or not) is a dot-segment that URL
    /// normalization removes, so it can never name an issue and is reported
    /// as not found instead of addressing the parent resource.
    pub fn issue_url(credentials: &Credentials, key: &IssueKey) -> Result<Url> {
        if is_dot_segment(key.as_str()) {
            return Err(LookupError::NotFound(key.clone()));
        }

        let mut url = Url::parse(credentials.base())
            .map_err(|e| LookupError::Unexpected(UnexpectedCause::InvalidUrl(e.to_string())))?;

        url.path_segments_mut()
            .map_err(|_| {
                LookupError::Unexpected(UnexpectedCause::InvalidUrl(
                    credentials.base_url.clone(),
                ))
            })?
            .pop_if_empty()
            .extend(ISSUE_PATH)
            .push(key.as_str());

        Ok(url)
    }

    pub async fn fetch_issue(
        &self,
        credentials: &Credentials,
        key: &IssueKey,
    ) -> Result<IssuePayload> {
        let url = Self::issue_url(credentials, key)?;
        // Token-only Basic auth kept for compatibility with existing installs.
        // Trackers that expect `user:token` need a username setting here.
        let auth = TokenAuth::new(credentials.token.as_str());

        tracing::debug!("Fetching issue {} from {}", key, url);

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth.to_basic_auth())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                let issue: IssuePayload = serde_json::from_slice(&body)?;
                tracing::debug!("Issue {} found", issue.key);
                Ok(issue)
            }
            StatusCode::NOT_FOUND => {
                tracing::info!("Issue {} not found", key);
                Err(LookupError::NotFound(key.clone()))
            }
            status => {
                tracing::warn!("Unexpected status {} looking up {}", status, key);
                Err(LookupError::Unexpected(UnexpectedCause::Status(
                    status.as_u16(),
                )))
            }
        }
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> IssueKey {
        IssueKey::new(s).unwrap()
    }

    #[test]
    fn test_issue_url() {
        let creds = Credentials::new("https://example.atlassian.net", "t");
        let url = TrackerClient::issue_url(&creds, &key("PROJ-123")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.atlassian.net/rest/api/3/issue/PROJ-123"
        );
    }

    #[test]
    fn test_issue_url_with_trailing_slash_and_prefix() {
        let creds = Credentials::new("https://example.com/jira/", "t");
        let url = TrackerClient::issue_url(&creds, &key("PROJ-1")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/jira/rest/api/3/issue/PROJ-1");
    }

    #[test]
    fn test_issue_url_escapes_key() {
        let creds = Credentials::new("https://example.atlassian.net", "t");
        let url = TrackerClient::issue_url(&creds, &key("../A B")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.atlassian.net/rest/api/3/issue/..%2FA%20B"
        );
    }

    #[test]
    fn test_issue_url_dot_keys_are_not_found() {
        let creds = Credentials::new("https://example.atlassian.net", "t");
        for dots in [".", ".."] {
            let err = TrackerClient::issue_url(&creds, &key(dots)).unwrap_err();
            match err {
                LookupError::NotFound(k) => assert_eq!(k.as_str(), dots),
                other => panic!("expected not found for {:?}, got {:?}", dots, other),
            }
        }
    }

    #[test]
    fn test_issue_url_keeps_dots_inside_keys() {
        let creds = Credentials::new("https://example.atlassian.net", "t");
        let url = TrackerClient::issue_url(&creds, &key("...")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.atlassian.net/rest/api/3/issue/..."
        );
        let url = TrackerClient::issue_url(&creds, &key("%2e%2e")).unwrap();
        assert!(url.as_str().ends_with("/rest/api/3/issue/%252e%252e"));
    }

    #[test]
    fn test_issue_url_rejects_garbage_base() {
        let creds = Credentials::new("not a url", "t");
        let err = TrackerClient::issue_url(&creds, &key("PROJ-1")).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Unexpected(UnexpectedCause::InvalidUrl(_))
        ));
    }
}

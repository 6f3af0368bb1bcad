//! Error types for issue lookups

use jiraa_core::models::IssueKey;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Issue `{0}` not found")]
    NotFound(IssueKey),

    #[error("Unexpected tracker response: {0}")]
    Unexpected(UnexpectedCause),
}

/// Why a lookup could not be classified as found or not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnexpectedCause {
    Status(u16),
    Transport(String),
    Payload(String),
    InvalidUrl(String),
}

impl fmt::Display for UnexpectedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnexpectedCause::Status(code) => write!(f, "HTTP status {}", code),
            UnexpectedCause::Transport(cause) => write!(f, "transport failure: {}", cause),
            UnexpectedCause::Payload(cause) => write!(f, "malformed issue payload: {}", cause),
            UnexpectedCause::InvalidUrl(cause) => write!(f, "invalid tracker URL: {}", cause),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Unexpected(UnexpectedCause::Transport(err.to_string()))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Unexpected(UnexpectedCause::Payload(err.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

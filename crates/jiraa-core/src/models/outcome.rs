//! Result of a single command invocation

use super::issue::{IssueKey, IssueSummary};
use super::settings::AppSetting;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum CommandOutcome {
    Help,
    LookupSuccess(IssueSummary),
    LookupNotFound(IssueKey),
    LookupError(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// Required settings are absent or blank.
    Configuration { missing: Vec<AppSetting> },
    /// Unexpected status code, transport failure or malformed payload.
    Unexpected { key: IssueKey, cause: String },
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::LookupSuccess(_))
    }
}

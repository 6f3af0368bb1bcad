//! Tracker API types
//!
//! Only the fields the presenter reads are modelled. Everything else in the
//! response body is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub summary: String,
    pub status: IssueStatus,
    pub priority: NamedField,
    pub issuetype: NamedField,
    #[serde(default)]
    pub assignee: Option<IssueUser>,
    pub project: IssueProject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub name: String,
    #[serde(rename = "statusCategory")]
    pub status_category: StatusCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCategory {
    #[serde(rename = "colorName")]
    pub color_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueUser {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueProject {
    #[serde(rename = "avatarUrls")]
    pub avatar_urls: AvatarUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarUrls {
    #[serde(rename = "48x48")]
    pub large: String,
}

impl IssuePayload {
    pub fn assignee_display_name(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .and_then(|user| user.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

//! Issue presentation
//!
//! Pure mapping from a tracker payload to an [`IssueSummary`], and from a
//! summary to the chat attachment posted in the room.

use jiraa_core::models::{
    Attachment, AttachmentAuthor, AttachmentField, AttachmentTitle, Credentials, IssueSummary,
};
use jiraa_tracker::IssuePayload;

pub const UNASSIGNED: &str = "Unassigned";

/// Stands in for the issue description. Rich-text bodies are not rendered.
pub const DESCRIPTION_PLACEHOLDER: &str = "Issue Description here!";

const TITLE_LINK_TEXT: &str = "Open";

pub fn present(credentials: &Credentials, payload: &IssuePayload) -> IssueSummary {
    let fields = &payload.fields;

    IssueSummary {
        key: payload.key.clone(),
        url: credentials.browse_url(&payload.key),
        title: fields.summary.clone(),
        status_name: fields.status.name.clone(),
        status_color: fields.status.status_category.color_name.clone(),
        priority_name: fields.priority.name.clone(),
        type_name: fields.issuetype.name.clone(),
        assignee_name: payload
            .assignee_display_name()
            .unwrap_or(UNASSIGNED)
            .to_string(),
        avatar_url: fields.project.avatar_urls.large.clone(),
    }
}

pub fn attachment(summary: &IssueSummary) -> Attachment {
    Attachment {
        title: AttachmentTitle {
            value: TITLE_LINK_TEXT.to_string(),
            link: summary.url.clone(),
        },
        text: DESCRIPTION_PLACEHOLDER.to_string(),
        collapsed: false,
        author: AttachmentAuthor {
            name: summary.headline(),
            link: summary.url.clone(),
            icon: summary.avatar_url.clone(),
        },
        color: summary.status_color.clone(),
        fields: vec![
            AttachmentField::short("Status", code(&summary.status_name)),
            AttachmentField::short("Priority", code(&summary.priority_name)),
            AttachmentField::short("Type", code(&summary.type_name)),
            AttachmentField::short("Assignee", code(&summary.assignee_name)),
        ],
    }
}

fn code(value: &str) -> String {
    format!("`{}`", value)
}

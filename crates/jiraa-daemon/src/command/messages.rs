//! User-facing text

use jiraa_core::models::{AppSetting, COMMAND_NAME};

pub fn help_text() -> String {
    format!(
        "You can run:\n\
         `/{cmd} ISSUE-ID` to display an issue\n\
         `/{cmd} [help]` to get help",
        cmd = COMMAND_NAME
    )
}

pub fn not_found(key: &str) -> String {
    format!("Issue `{}` not found.", key)
}

pub fn not_configured(missing: &[AppSetting]) -> String {
    let settings = missing
        .iter()
        .map(|setting| format!("`{}`", setting.id()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "The issue tracker integration is not configured (missing {}). \
         Ask an administrator to fill in the app settings.",
        settings
    )
}

pub fn lookup_failed(key: &str) -> String {
    format!(
        "Could not look up issue `{}`: the issue tracker did not answer as expected. \
         Please try again later.",
        key
    )
}

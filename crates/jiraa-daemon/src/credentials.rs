//! Credential resolution

use std::sync::Arc;

use jiraa_core::models::{AppSetting, Credentials};

use crate::settings::SettingsReader;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required settings: {}", format_missing(.0))]
    MissingSettings(Vec<AppSetting>),
}

fn format_missing(missing: &[AppSetting]) -> String {
    missing
        .iter()
        .map(AppSetting::id)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reads tracker credentials from settings. Nothing is cached: settings may
/// change between invocations.
#[derive(Clone)]
pub struct CredentialResolver {
    settings: Arc<dyn SettingsReader>,
}

impl CredentialResolver {
    pub fn new(settings: Arc<dyn SettingsReader>) -> Self {
        Self { settings }
    }

    pub async fn resolve(&self) -> Result<Credentials, ConfigError> {
        let token = self.settings.read(AppSetting::JiraAltToken).await;
        let base_url = self.settings.read(AppSetting::JiraAltUrl).await;

        match (base_url, token) {
            (Some(base_url), Some(token)) => Ok(Credentials::new(base_url, token)),
            (base_url, token) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(AppSetting::JiraAltToken);
                }
                if base_url.is_none() {
                    missing.push(AppSetting::JiraAltUrl);
                }
                Err(ConfigError::MissingSettings(missing))
            }
        }
    }
}

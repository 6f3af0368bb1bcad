//! App settings registry and stored values

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const REDACTED: &str = "********";

/// Identifier of a host-editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AppSetting {
    #[serde(rename = "jiraalt_token")]
    JiraAltToken,
    #[serde(rename = "jiraalt_url")]
    JiraAltUrl,
}

impl AppSetting {
    pub const ALL: [AppSetting; 2] = [AppSetting::JiraAltToken, AppSetting::JiraAltUrl];

    pub fn id(&self) -> &'static str {
        match self {
            AppSetting::JiraAltToken => "jiraalt_token",
            AppSetting::JiraAltUrl => "jiraalt_url",
        }
    }

    pub fn i18n_label(&self) -> &'static str {
        match self {
            AppSetting::JiraAltToken => "JiraAlt_TokenLabel",
            AppSetting::JiraAltUrl => "JiraAlt_UrlLabel",
        }
    }

    /// Whether the value must be hidden when settings are read back.
    pub fn is_secret(&self) -> bool {
        matches!(self, AppSetting::JiraAltToken)
    }
}

impl fmt::Display for AppSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AppSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AppSetting::ALL
            .into_iter()
            .find(|setting| setting.id() == s)
            .ok_or_else(|| Error::UnknownSetting(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
}

/// Declaration of a setting as registered with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDefinition {
    pub id: AppSetting,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub package_value: String,
    pub public: bool,
    pub hidden: bool,
    pub required: bool,
    pub i18n_label: String,
}

impl SettingDefinition {
    fn required_string(id: AppSetting) -> Self {
        Self {
            id,
            setting_type: SettingType::String,
            package_value: String::new(),
            public: true,
            hidden: false,
            required: true,
            i18n_label: id.i18n_label().to_string(),
        }
    }
}

/// All settings the app provides, in registration order.
pub fn definitions() -> Vec<SettingDefinition> {
    AppSetting::ALL
        .into_iter()
        .map(SettingDefinition::required_string)
        .collect()
}

/// Current values of the app settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingValues {
    values: BTreeMap<AppSetting, String>,
}

impl SettingValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a setting; blank values read as absent.
    pub fn get(&self, setting: AppSetting) -> Option<&str> {
        self.values
            .get(&setting)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, setting: AppSetting, value: impl Into<String>) {
        self.values.insert(setting, value.into());
    }

    pub fn with(mut self, setting: AppSetting, value: impl Into<String>) -> Self {
        self.set(setting, value);
        self
    }

    /// Required settings that have no usable value.
    pub fn missing_required(&self) -> Vec<AppSetting> {
        definitions()
            .into_iter()
            .filter(|definition| definition.required && self.get(definition.id).is_none())
            .map(|definition| definition.id)
            .collect()
    }

    /// Copy safe to hand to clients: secret values are masked.
    pub fn redacted(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|(setting, value)| {
                let shown = if setting.is_secret() && !value.is_empty() {
                    REDACTED.to_string()
                } else {
                    value.clone()
                };
                (*setting, shown)
            })
            .collect();
        Self { values }
    }
}

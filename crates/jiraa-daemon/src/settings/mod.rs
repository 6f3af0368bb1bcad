//! App settings: the read capability handed to the lookup pipeline and the
//! manager that owns the stored values.

pub mod manager;

pub use manager::{SettingsManager, SettingsManagerError};

use async_trait::async_trait;
use jiraa_core::models::{AppSetting, SettingValues};

/// Read access to the host's settings.
#[async_trait]
pub trait SettingsReader: Send + Sync {
    /// Current value of `setting`, `None` when absent or blank.
    async fn read(&self, setting: AppSetting) -> Option<String>;
}

#[async_trait]
impl SettingsReader for SettingValues {
    async fn read(&self, setting: AppSetting) -> Option<String> {
        self.get(setting).map(str::to_string)
    }
}

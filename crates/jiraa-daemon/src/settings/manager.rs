//! Settings manager

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use jiraa_core::{
    models::{AppSetting, SettingValues},
    storage::{init_config_dir, SettingsStorage},
    Result as CoreResult,
};

use super::SettingsReader;
use crate::event_manager::EventManager;
use crate::events::SettingsEvent;

/// Settings manager error
#[derive(Debug, thiserror::Error)]
pub enum SettingsManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] jiraa_core::Error),
}

pub type Result<T> = std::result::Result<T, SettingsManagerError>;

/// Owns the persisted setting values. Every read goes through the in-memory
/// copy, so a write is visible to the very next command invocation.
pub struct SettingsManager {
    event_manager: Arc<EventManager>,
    storage: SettingsStorage,
    values: Arc<RwLock<SettingValues>>,
}

impl SettingsManager {
    pub fn new(event_manager: Arc<EventManager>) -> CoreResult<Self> {
        let config_dir = init_config_dir()?;
        Self::with_config_dir(event_manager, config_dir)
    }

    pub fn with_config_dir(event_manager: Arc<EventManager>, config_dir: PathBuf) -> CoreResult<Self> {
        let storage = SettingsStorage::new(config_dir);
        let values = storage.load()?;

        tracing::debug!("Loaded settings from {}", storage.path().display());

        Ok(Self {
            event_manager,
            storage,
            values: Arc::new(RwLock::new(values)),
        })
    }

    pub async fn get(&self) -> SettingValues {
        self.values.read().await.clone()
    }

    pub async fn set(&self, setting: AppSetting, value: String) -> Result<SettingValues> {
        let updated = {
            let mut current = self.values.write().await;
            let mut updated = current.clone();
            updated.set(setting, value);
            self.storage.save(&updated)?;
            *current = updated.clone();
            updated
        };

        tracing::info!("Setting {} updated", setting);
        self.event_manager.emit_settings(SettingsEvent::updated(setting));

        Ok(updated)
    }

    pub async fn reset(&self) -> Result<SettingValues> {
        let values = SettingValues::default();
        {
            let mut current = self.values.write().await;
            self.storage.save(&values)?;
            *current = values.clone();
        }

        tracing::info!("Settings reset");
        self.event_manager.emit_settings(SettingsEvent::reset());

        Ok(values)
    }
}

#[async_trait]
impl SettingsReader for SettingsManager {
    async fn read(&self, setting: AppSetting) -> Option<String> {
        self.values.read().await.get(setting).map(str::to_string)
    }
}

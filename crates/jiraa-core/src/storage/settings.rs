//! Settings storage operations

use crate::{models::SettingValues, Result};
use std::path::PathBuf;

const SETTINGS_FILE: &str = "settings.json";

pub struct SettingsStorage {
    config_dir: PathBuf,
}

impl SettingsStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub fn load(&self) -> Result<SettingValues> {
        let settings_path = self.path();

        if !settings_path.exists() {
            return Ok(SettingValues::default());
        }

        let content = std::fs::read_to_string(settings_path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            return Ok(SettingValues::default());
        }

        let values: SettingValues = serde_json::from_str(&content)?;
        Ok(values)
    }

    pub fn save(&self, values: &SettingValues) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }
}

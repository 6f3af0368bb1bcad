use chrono::{DateTime, Utc};
use jiraa_core::models::{AppSetting, RoomMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DaemonEvent {
    Chat(ChatEvent),
    Settings(SettingsEvent),
}

/// A room message was posted. Every member of the room may see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub room_id: String,
    pub message: RoomMessage,
    pub timestamp: DateTime<Utc>,
}

impl ChatEvent {
    pub fn room_message(message: RoomMessage) -> Self {
        Self {
            room_id: message.room_id.clone(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// A setting changed. Carries the id only, never the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsEvent {
    pub event_type: SettingsEventType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingsEventType {
    Updated { setting: AppSetting },
    Reset,
}

impl SettingsEvent {
    pub fn updated(setting: AppSetting) -> Self {
        Self {
            event_type: SettingsEventType::Updated { setting },
            timestamp: Utc::now(),
        }
    }

    pub fn reset() -> Self {
        Self {
            event_type: SettingsEventType::Reset,
            timestamp: Utc::now(),
        }
    }
}

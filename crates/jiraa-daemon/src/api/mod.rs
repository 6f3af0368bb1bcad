//! API handlers

pub mod command;
pub mod settings;

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::command::CommandRouter;
use crate::event_manager::EventManager;
use crate::events::DaemonEvent;
use crate::settings::SettingsManager;

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Settings error: {0}")]
    Settings(#[from] crate::settings::SettingsManagerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Main API handler that routes requests to appropriate handlers
pub struct ApiHandler {
    event_manager: Arc<EventManager>,
    settings_manager: Arc<SettingsManager>,
    router: Arc<CommandRouter>,
}

impl ApiHandler {
    pub fn new(
        event_manager: Arc<EventManager>,
        settings_manager: Arc<SettingsManager>,
        router: Arc<CommandRouter>,
    ) -> Self {
        Self {
            event_manager,
            settings_manager,
            router,
        }
    }

    pub async fn handle(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            // Command methods
            "command.execute" => {
                command::execute(&self.router, &self.event_manager, params).await
            }
            "command.describe" => command::describe(&self.router, params).await,

            // Settings methods
            "settings.definitions" => settings::definitions(params).await,
            "settings.get" => settings::get(&self.settings_manager, params).await,
            "settings.set" => settings::set(&self.settings_manager, params).await,
            "settings.reset" => settings::reset(&self.settings_manager, params).await,

            // Unknown method
            _ => Err(ApiError::MethodNotFound(method.to_string())),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DaemonEvent> {
        self.event_manager.subscribe()
    }
}

/// Deserialize required params.
pub(crate) fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let params = params.ok_or_else(|| ApiError::InvalidParams("Missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| ApiError::InvalidParams(e.to_string()))
}

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use jiraa_core::models::{self, AppSetting};

use super::{parse_params, ApiError, Result};
use crate::settings::SettingsManager;

#[derive(Debug, Deserialize)]
struct SetParams {
    id: String,
    value: String,
}

pub async fn definitions(_params: Option<Value>) -> Result<Value> {
    Ok(serde_json::to_value(models::definitions())?)
}

/// Current values with secrets masked.
pub async fn get(manager: &Arc<SettingsManager>, _params: Option<Value>) -> Result<Value> {
    let values = manager.get().await;
    Ok(serde_json::to_value(values.redacted())?)
}

pub async fn set(manager: &Arc<SettingsManager>, params: Option<Value>) -> Result<Value> {
    let params: SetParams = parse_params(params)?;
    let setting: AppSetting = params
        .id
        .parse()
        .map_err(|e: jiraa_core::Error| ApiError::InvalidParams(e.to_string()))?;

    let values = manager.set(setting, params.value).await?;
    Ok(serde_json::to_value(values.redacted())?)
}

pub async fn reset(manager: &Arc<SettingsManager>, _params: Option<Value>) -> Result<Value> {
    let values = manager.reset().await?;
    Ok(serde_json::to_value(values.redacted())?)
}

use serde_json::{json, Value};
use std::sync::Arc;

use jiraa_core::models::CommandContext;

use super::{parse_params, ApiError, Result};
use crate::chat::RoomBroadcaster;
use crate::command::CommandRouter;
use crate::event_manager::EventManager;

pub async fn execute(
    router: &Arc<CommandRouter>,
    event_manager: &Arc<EventManager>,
    params: Option<Value>,
) -> Result<Value> {
    let context: CommandContext = parse_params(params)?;

    if context.sender.trim().is_empty() {
        return Err(ApiError::InvalidParams("sender cannot be empty".to_string()));
    }
    if context.room_id.trim().is_empty() {
        return Err(ApiError::InvalidParams("room_id cannot be empty".to_string()));
    }

    let broadcaster = RoomBroadcaster::new(event_manager.clone());
    let outcome = router.execute(&context, &broadcaster).await;
    let delivery = broadcaster.into_deliveries().await.into_iter().next();

    Ok(json!({
        "outcome": outcome,
        "delivery": delivery,
    }))
}

pub async fn describe(router: &Arc<CommandRouter>, _params: Option<Value>) -> Result<Value> {
    Ok(serde_json::to_value(router.metadata())?)
}

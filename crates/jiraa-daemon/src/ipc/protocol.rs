//! JSON-RPC 2.0 messages exchanged over the daemon socket, one per line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;
use crate::events::DaemonEvent;

pub const JSONRPC_VERSION: &str = "2.0";

/// Server-pushed notification carrying a room message.
pub const ROOM_MESSAGE_METHOD: &str = "chat.room_message";
/// Server-pushed notification announcing a settings change.
pub const SETTINGS_EVENT_METHOD: &str = "settings.event";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: RequestId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(-32700, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(-32600, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(-32602, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(-32603, message)
    }
}

impl From<ApiError> for JsonRpcError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::MethodNotFound(method) => JsonRpcError::method_not_found(&method),
            ApiError::InvalidParams(message) => JsonRpcError::invalid_params(message),
            other => JsonRpcError::internal_error(other.to_string()),
        }
    }
}

impl Request {
    pub fn new(method: String, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method,
            params,
            id,
        }
    }

    pub fn validate(&self) -> Result<(), JsonRpcError> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcError::invalid_request("Invalid JSON-RPC version"));
        }
        Ok(())
    }
}

impl Response {
    pub fn success(result: Value, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    /// Wire form of a daemon event.
    pub fn from_event(event: &DaemonEvent) -> serde_json::Result<Self> {
        let (method, params) = match event {
            DaemonEvent::Chat(e) => (ROOM_MESSAGE_METHOD, serde_json::to_value(e)?),
            DaemonEvent::Settings(e) => (SETTINGS_EVENT_METHOD, serde_json::to_value(e)?),
        };
        Ok(Self::new(method, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChatEvent, SettingsEvent};
    use jiraa_core::models::{AppSetting, RoomMessage};
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = Request::new(
            "command.execute".to_string(),
            Some(json!({"sender": "alice", "room_id": "GENERAL", "arguments": ["PROJ-1"]})),
            RequestId::Number(1),
        );

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"method\":\"command.execute\""));
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
    }

    #[test]
    fn test_request_validate_version() {
        let mut req = Request::new("settings.get".to_string(), None, RequestId::Null);
        assert!(req.validate().is_ok());

        req.jsonrpc = "1.0".to_string();
        assert_eq!(req.validate().unwrap_err().code, -32600);
    }

    #[test]
    fn test_api_errors_map_to_json_rpc_codes() {
        let not_found: JsonRpcError = ApiError::MethodNotFound("timer.start".to_string()).into();
        assert_eq!(not_found.code, -32601);

        let invalid: JsonRpcError = ApiError::InvalidParams("Missing params".to_string()).into();
        assert_eq!(invalid.code, -32602);
        assert_eq!(invalid.message, "Missing params");
    }

    #[test]
    fn test_room_message_notification() {
        let event = DaemonEvent::Chat(ChatEvent::room_message(RoomMessage::new("GENERAL")));
        let notif = Notification::from_event(&event).unwrap();

        assert_eq!(notif.method, ROOM_MESSAGE_METHOD);
        assert_eq!(notif.params["room_id"], "GENERAL");
        assert_eq!(notif.params["message"]["room_id"], "GENERAL");
    }

    #[test]
    fn test_settings_notification() {
        let event = DaemonEvent::Settings(SettingsEvent::updated(AppSetting::JiraAltUrl));
        let notif = Notification::from_event(&event).unwrap();
        assert_eq!(notif.method, SETTINGS_EVENT_METHOD);
    }

    #[test]
    fn test_request_id_types() {
        let req1 = Request::new("test".to_string(), None, RequestId::Number(42));
        let req2 = Request::new(
            "test".to_string(),
            None,
            RequestId::String("abc".to_string()),
        );

        let json1 = serde_json::to_string(&req1).unwrap();
        let json2 = serde_json::to_string(&req2).unwrap();

        assert!(json1.contains("\"id\":42"));
        assert!(json2.contains("\"id\":\"abc\""));
    }
}

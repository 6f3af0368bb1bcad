//! Slash command invocation types

use serde::{Deserialize, Serialize};

/// Name users type after the slash.
pub const COMMAND_NAME: &str = "jiraa";

/// Who invoked the command, where, and with which arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    pub sender: String,
    pub room_id: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl CommandContext {
    pub fn new(
        sender: impl Into<String>,
        room_id: impl Into<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            room_id: room_id.into(),
            arguments,
        }
    }
}

/// How the command is registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub command: String,
    pub i18n_params_example: String,
    pub i18n_description: String,
    pub provides_preview: bool,
}

impl Default for CommandMetadata {
    fn default() -> Self {
        Self {
            command: COMMAND_NAME.to_string(),
            i18n_params_example: "JiraAlt_Params".to_string(),
            i18n_description: "JiraAlt_Description".to_string(),
            provides_preview: false,
        }
    }
}

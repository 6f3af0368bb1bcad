pub mod command;
pub mod credentials;
pub mod issue;
pub mod message;
pub mod outcome;
pub mod settings;

pub use command::{CommandContext, CommandMetadata, COMMAND_NAME};
pub use credentials::Credentials;
pub use issue::{IssueKey, IssueSummary};
pub use message::{
    Attachment, AttachmentAuthor, AttachmentField, AttachmentTitle, Block, Delivery, Notification,
    RoomMessage, TextKind, TextObject,
};
pub use outcome::{CommandOutcome, FailureReason};
pub use settings::{definitions, AppSetting, SettingDefinition, SettingType, SettingValues};

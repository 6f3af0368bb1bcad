//! Jiraa Daemon Library
//!
//! Hosts the `/jiraa` command: settings, issue lookup pipeline and the
//! JSON-RPC socket clients talk to. Exposed as a library for testing.

pub mod api;
pub mod chat;
pub mod command;
pub mod credentials;
pub mod event_manager;
pub mod events;
pub mod ipc;
pub mod presenter;
pub mod settings;

pub use api::ApiHandler;
pub use chat::{ChatEmitter, RoomBroadcaster, Transcript};
pub use command::CommandRouter;
pub use credentials::{ConfigError, CredentialResolver};
pub use event_manager::EventManager;
pub use events::DaemonEvent;
pub use ipc::{IpcServer, Notification, Request, Response};
pub use settings::{SettingsManager, SettingsReader};

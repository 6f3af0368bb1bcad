//! IPC module for daemon communication

pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, Notification, Request, RequestId, Response};
pub use server::IpcServer;

//! Chat emission
//!
//! The command pipeline never talks to a chat backend directly. It is handed a
//! [`ChatEmitter`] for the invocation and calls it exactly once.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use jiraa_core::models::{Delivery, Notification, RoomMessage};

use crate::event_manager::EventManager;
use crate::events::ChatEvent;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat backend rejected delivery: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;

#[async_trait]
pub trait ChatEmitter: Send + Sync {
    /// Post into a room, visible to all members.
    async fn send_room_message(&self, message: RoomMessage) -> Result<()>;

    /// Ephemeral notice, visible to the recipient only.
    async fn notify_user(&self, notification: Notification) -> Result<()>;
}

pub async fn deliver(chat: &dyn ChatEmitter, delivery: Delivery) -> Result<()> {
    match delivery {
        Delivery::RoomMessage(message) => chat.send_room_message(message).await,
        Delivery::Notification(notification) => chat.notify_user(notification).await,
    }
}

/// Records deliveries in order.
#[derive(Default)]
pub struct Transcript {
    deliveries: Mutex<Vec<Delivery>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }

    pub async fn take(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.deliveries.lock().await)
    }
}

#[async_trait]
impl ChatEmitter for Transcript {
    async fn send_room_message(&self, message: RoomMessage) -> Result<()> {
        self.deliveries
            .lock()
            .await
            .push(Delivery::RoomMessage(message));
        Ok(())
    }

    async fn notify_user(&self, notification: Notification) -> Result<()> {
        self.deliveries
            .lock()
            .await
            .push(Delivery::Notification(notification));
        Ok(())
    }
}

/// Emitter used by the daemon: records the delivery for the invoking client
/// and broadcasts room messages to every connected client.
pub struct RoomBroadcaster {
    event_manager: Arc<EventManager>,
    transcript: Transcript,
}

impl RoomBroadcaster {
    pub fn new(event_manager: Arc<EventManager>) -> Self {
        Self {
            event_manager,
            transcript: Transcript::new(),
        }
    }

    pub async fn into_deliveries(self) -> Vec<Delivery> {
        self.transcript.take().await
    }
}

#[async_trait]
impl ChatEmitter for RoomBroadcaster {
    async fn send_room_message(&self, message: RoomMessage) -> Result<()> {
        self.event_manager
            .emit_chat(ChatEvent::room_message(message.clone()));
        self.transcript.send_room_message(message).await
    }

    async fn notify_user(&self, notification: Notification) -> Result<()> {
        self.transcript.notify_user(notification).await
    }
}

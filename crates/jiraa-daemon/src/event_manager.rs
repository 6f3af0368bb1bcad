//! Central event management and broadcasting

use tokio::sync::broadcast;

use crate::events::{ChatEvent, DaemonEvent, SettingsEvent};

/// Fans daemon events out to every connected client
pub struct EventManager {
    event_tx: broadcast::Sender<DaemonEvent>,
}

impl EventManager {
    /// Create a new event manager with a broadcast channel
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1000);
        Self { event_tx }
    }

    /// Subscribe to all daemon events
    pub fn subscribe(&self) -> broadcast::Receiver<DaemonEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast a room message
    pub fn emit_chat(&self, event: ChatEvent) {
        let room_id = event.room_id.clone();
        match self.event_tx.send(DaemonEvent::Chat(event)) {
            Ok(count) => tracing::debug!(
                "EventManager: room message for {} sent to {} receivers",
                room_id,
                count
            ),
            // No subscribers is normal when no client is watching.
            Err(_) => tracing::debug!("EventManager: no subscribers for room {}", room_id),
        }
    }

    /// Broadcast a settings change
    pub fn emit_settings(&self, event: SettingsEvent) {
        let _ = self.event_tx.send(DaemonEvent::Settings(event));
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

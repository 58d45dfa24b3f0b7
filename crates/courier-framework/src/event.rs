//! Per-dispatch message event.

use std::sync::Arc;

use courier_core::Message;

/// A message travelling through one dispatch pass.
///
/// The message itself is shared and immutable. The only mutable state is the
/// cancellation flag: once a handler sets it, the dispatcher stops offering
/// the event to later handlers.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    message: Arc<Message>,
    cancelled: bool,
}

impl MessageEvent {
    pub fn new(message: Arc<Message>) -> Self {
        Self {
            message,
            cancelled: false,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns a new handle to the shared message.
    pub fn message_arc(&self) -> Arc<Message> {
        Arc::clone(&self.message)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stops routing after the current handler returns.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

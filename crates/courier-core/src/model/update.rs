use serde::Deserialize;

use super::message::Message;
use super::raw::RawMessage;

/// One inbound event.
///
/// `message` is `None` when the payload carried no message or the message
/// could not be classified. Such updates still count for the polling
/// offset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawUpdate")]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

impl Update {
    pub fn new(update_id: i64, message: Option<Message>) -> Self {
        Self { update_id, message }
    }
}

#[derive(Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<RawMessage>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        Self {
            update_id: raw.update_id,
            message: raw.message.and_then(RawMessage::classify),
        }
    }
}

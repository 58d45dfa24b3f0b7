//! Test doubles and message builders.
//!
//! Available in this crate's tests and, with the `testing` feature, to
//! downstream crates.

use std::collections::VecDeque;
use std::path::PathBuf;

use async_trait::async_trait;
use courier_core::{
    ApiError, ApiResult, BotApi, Chat, Command, GetUpdates, Media, Message, MessageKind,
    SendMessage, SetWebhook, User,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Chat id used by the message builders below.
pub const TEST_CHAT_ID: i64 = 42;

/// Builds a private-chat message with the given kind.
pub fn message(message_id: i64, kind: MessageKind) -> Message {
    Message::new(
        message_id,
        Chat::Private(User::new(TEST_CHAT_ID).with_first_name("Tester")),
        kind,
    )
    .with_sender(User::new(TEST_CHAT_ID).with_first_name("Tester"))
}

/// Builds a text message, or a command message when `text` starts with `/`.
pub fn text_message(message_id: i64, text: &str) -> Message {
    let kind = match Command::parse(text) {
        Some(cmd) => MessageKind::Command(cmd),
        None => MessageKind::Text { text: text.into() },
    };
    message(message_id, kind)
}

/// Builds an uncaptioned media message.
pub fn media_message(message_id: i64, media: Media) -> Message {
    message(message_id, MessageKind::Media { media, caption: None })
}

/// A call observed by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetMe,
    SendMessage(SendMessage),
    GetUpdates(GetUpdates),
    SetWebhook {
        url: String,
        certificate: Option<PathBuf>,
    },
    DeleteWebhook,
}

/// An in-memory [`BotApi`] that records every call.
///
/// `get_updates` answers from a queue of scripted batches. Once the queue
/// is drained it never resolves, like a long poll with nothing to deliver.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    batches: Mutex<VecDeque<ApiResult<Vec<Value>>>>,
    next_message_id: Mutex<i64>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful `getUpdates` batch.
    pub fn push_updates(&self, updates: Vec<Value>) {
        self.batches.lock().push_back(Ok(updates));
    }

    /// Queues a failing `getUpdates` call.
    pub fn push_failure(&self, description: &str) {
        self.batches.lock().push_back(Err(ApiError::Rejected {
            code: 502,
            description: description.into(),
        }));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Returns every `sendMessage` request in call order.
    pub fn sent(&self) -> Vec<SendMessage> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::SendMessage(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the offsets of every `getUpdates` request in call order.
    pub fn polled_offsets(&self) -> Vec<Option<i64>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::GetUpdates(req) => Some(req.offset),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl BotApi for RecordingApi {
    async fn get_me(&self) -> ApiResult<User> {
        self.record(ApiCall::GetMe);
        Ok(User::new(1).with_username("courier_test_bot"))
    }

    async fn send_message(&self, request: SendMessage) -> ApiResult<i64> {
        self.record(ApiCall::SendMessage(request));
        let mut id = self.next_message_id.lock();
        *id += 1;
        Ok(*id)
    }

    async fn get_updates(&self, request: GetUpdates) -> ApiResult<Vec<Value>> {
        self.record(ApiCall::GetUpdates(request));
        let next = self.batches.lock().pop_front();
        match next {
            Some(batch) => batch,
            None => std::future::pending().await,
        }
    }

    async fn set_webhook(&self, request: SetWebhook) -> ApiResult<()> {
        self.record(ApiCall::SetWebhook {
            url: request.url,
            certificate: request.certificate,
        });
        Ok(())
    }

    async fn delete_webhook(&self) -> ApiResult<()> {
        self.record(ApiCall::DeleteWebhook);
        Ok(())
    }
}

//! Outbound Bot API surface.
//!
//! [`BotApi`] is the seam between handlers and the network. The reqwest
//! implementation lives in `courier-transport`; tests use an in-memory
//! double.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::model::User;

/// A shared, type-erased API client.
pub type BoxedApi = Arc<dyn BotApi>;

/// The Bot API calls Courier needs.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Returns the bot's own account.
    async fn get_me(&self) -> ApiResult<User>;

    /// Sends a text message and returns the id of the sent message.
    async fn send_message(&self, request: SendMessage) -> ApiResult<i64>;

    /// Long-polls for updates.
    ///
    /// Updates are returned undecoded so that one malformed update cannot
    /// hide the rest of the batch.
    async fn get_updates(&self, request: GetUpdates) -> ApiResult<Vec<Value>>;

    async fn set_webhook(&self, request: SetWebhook) -> ApiResult<()>;

    async fn delete_webhook(&self) -> ApiResult<()>;

    /// Sends plain text, optionally as a reply.
    async fn send_text(&self, chat_id: i64, text: &str, reply_to: Option<i64>) -> ApiResult<i64> {
        let mut request = SendMessage::new(chat_id, text);
        request.reply_to_message_id = reply_to;
        self.send_message(request).await
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Text formatting applied by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}

/// `sendMessage` parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

impl SendMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: false,
            reply_to_message_id: None,
        }
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    pub fn disable_web_page_preview(mut self) -> Self {
        self.disable_web_page_preview = true;
        self
    }

    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }
}

/// `getUpdates` parameters. An absent offset asks for all pending updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GetUpdates {
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// `setWebhook` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetWebhook {
    pub url: String,
    /// Self-signed public key uploaded alongside the call.
    #[serde(skip)]
    pub certificate: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
}

impl SetWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            certificate: None,
            secret_token: None,
        }
    }
}

// =============================================================================
// Response envelope
// =============================================================================

/// The `{ ok, result, description, error_code }` envelope wrapping every
/// Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope into the call's result.
    pub fn into_result(self, method: &'static str) -> ApiResult<T> {
        if !self.ok {
            return Err(ApiError::Rejected {
                code: self.error_code.unwrap_or_default(),
                description: self.description.unwrap_or_else(|| "no description".into()),
            });
        }
        self.result.ok_or(ApiError::MissingResult { method })
    }
}

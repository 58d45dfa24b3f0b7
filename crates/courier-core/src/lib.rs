//! # Courier Core
//!
//! Data model and core traits for the Courier Telegram bot framework.
//!
//! ## Layout
//!
//! - [`model`]: immutable inbound values ([`Update`], [`Message`], [`Chat`],
//!   media records) and the classifier turning wire JSON into them
//! - [`api`]: the outbound [`BotApi`] trait, request types and the response
//!   envelope
//! - [`source`]: the [`UpdateSource`] / [`UpdateHandler`] seam between
//!   delivery and processing
//! - [`error`]: [`ApiError`] and [`TransportError`]
//!
//! ```text
//! ┌──────────────┐  Update  ┌───────────────┐  Message  ┌──────────┐
//! │ UpdateSource │─────────▶│ UpdateHandler │──────────▶│ handlers │
//! │ poll/webhook │          │     (Bot)     │           └────┬─────┘
//! └──────────────┘          └───────────────┘                │
//!                                                  BotApi ◀──┘
//! ```

pub mod api;
pub mod error;
pub mod model;
pub mod source;

pub use api::{
    ApiResponse, BotApi, BoxedApi, GetUpdates, ParseMode, SendMessage, SetWebhook,
};
pub use error::{ApiError, ApiResult, TransportError, TransportResult};
pub use model::{
    Audio, Chat, Command, Contact, Document, File, Location, Media, Message, MessageKind, Picture,
    PictureSet, RawChat, RawMessage, Sticker, Update, User, Video, Voice,
};
pub use source::{BoxedUpdateHandler, BoxedUpdateSource, UpdateHandler, UpdateSource};

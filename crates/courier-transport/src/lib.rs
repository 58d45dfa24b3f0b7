//! # Courier Transport
//!
//! Talks to the Bot API and turns its output into [`Update`]s.
//!
//! - [`HttpBotApi`]: a reqwest-backed [`BotApi`] implementation
//! - [`PollingSource`]: long-polls `getUpdates` (feature `polling`)
//! - [`WebhookSource`]: receives pushed updates over HTTP (feature `webhook`)
//!
//! Both sources implement [`UpdateSource`] and hand every update to an
//! [`UpdateHandler`](courier_core::UpdateHandler), usually a `Bot` from
//! `courier-framework`.
//!
//! ```text
//! ┌──────────────┐  getUpdates   ┌───────────────┐
//! │   Bot API    │ ◄──────────── │ PollingSource │ ─┐
//! │              │ ────────────► │ WebhookSource │ ─┤ Update
//! └──────────────┘  POST /hook   └───────────────┘  ▼
//!        ▲                                     UpdateHandler
//!        └──────────── HttpBotApi ◄──────────── (handlers reply)
//! ```
//!
//! [`Update`]: courier_core::Update
//! [`BotApi`]: courier_core::BotApi
//! [`UpdateSource`]: courier_core::UpdateSource

pub mod backoff;
pub mod http_client;

#[cfg(feature = "polling")]
pub mod polling;

#[cfg(feature = "webhook")]
pub mod webhook;

pub use backoff::{Backoff, BackoffPolicy};
pub use http_client::{DEFAULT_API_URL, HttpBotApi, HttpBotApiBuilder};

#[cfg(feature = "polling")]
pub use polling::{DEFAULT_POLL_TIMEOUT, PollCursor, PollingOptions, PollingSource};

#[cfg(feature = "webhook")]
pub use webhook::{SECRET_TOKEN_HEADER, WebhookOptions, WebhookSource};

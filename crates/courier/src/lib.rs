//! # Courier
//!
//! An asynchronous Telegram bot framework with typed message routing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  Update  ┌─────┐  Message  ┌────────────┐  event  ┌──────────┐
//! │ PollingSource│────────▶│ Bot │─────────▶│ Dispatcher │───────▶│ handlers │──▶ BotApi
//! │ WebhookSource│         └─────┘          └────────────┘        └──────────┘
//! └──────────────┘
//! ```
//!
//! - **Sources** receive raw updates by long polling or webhook
//! - **Bot** decodes each update and hands its message to the dispatcher
//! - **Dispatcher** walks registrations in order, matching on message type
//! - **Handlers** reply through the [`BotApi`](core::BotApi) and may cancel
//!   the event to stop later handlers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = CourierRuntime::builder().build()?;
//!
//!     let echo = handler_fn(|event, api| {
//!         Box::pin(async move {
//!             let message = event.message();
//!             if let Some(text) = message.text() {
//!                 api.send_text(message.chat_id(), text, None).await?;
//!             }
//!             Ok(())
//!         })
//!     });
//!
//!     let dispatcher = DispatcherBuilder::new()
//!         .register(MessageType::TEXT, echo)
//!         .build();
//!
//!     runtime.run(dispatcher).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): load `courier.toml` files
//! - `json-log`: JSON log output
//! - `testing`: the in-memory `RecordingApi` for handler tests

pub use courier_core as core;
pub use courier_framework as framework;
pub use courier_runtime as runtime;
pub use courier_transport as transport;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use courier_runtime::{CourierConfig, CourierRuntime};

    // Routing
    pub use courier_framework::{
        Category, DispatchReport, Dispatcher, DispatcherBuilder, MessageType, TypeMatcher,
    };

    // Handlers and commands
    pub use courier_framework::{
        Argument, CommandFilter, CommandSignature, HelpHandler, MessageEvent, MessageHandler,
        ValidatingCommandFilter, handler_fn,
    };

    // Message model and API
    pub use courier_core::{
        BotApi, BoxedApi, Chat, Command, Media, Message, MessageKind, ParseMode, SendMessage, User,
    };
}

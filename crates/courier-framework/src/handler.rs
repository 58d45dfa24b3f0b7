//! The handler trait and closure adapter.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_framework::{MessageEvent, handler_fn};
//!
//! let log = handler_fn(|event: &mut MessageEvent, _api| {
//!     Box::pin(async move {
//!         tracing::info!(chat_id = event.message().chat_id(), "Got a message");
//!         Ok(())
//!     })
//! });
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::BoxedApi;
use futures::future::BoxFuture;

use crate::event::MessageEvent;

/// Reacts to a message.
///
/// Handlers may send replies through `api` and may cancel the event to stop
/// later handlers from seeing it. An `Err` is logged by the dispatcher and
/// does not affect other handlers.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()>;
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn MessageHandler>;

#[async_trait]
impl<H: MessageHandler + ?Sized> MessageHandler for Arc<H> {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        (**self).handle(event, api).await
    }
}

/// A [`MessageHandler`] backed by a closure. Created by [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps a closure returning a boxed future into a [`MessageHandler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut MessageEvent, &'a BoxedApi) -> BoxFuture<'a, anyhow::Result<()>>
        + Send
        + Sync,
{
    HandlerFn { f }
}

#[async_trait]
impl<F> MessageHandler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut MessageEvent, &'a BoxedApi) -> BoxFuture<'a, anyhow::Result<()>>
        + Send
        + Sync,
{
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        (self.f)(event, api).await
    }
}

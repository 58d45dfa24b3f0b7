//! A dispatcher bound to an API client.
//!
//! [`Bot`] is what update sources talk to. It unwraps each [`Update`],
//! skips the ones without a classified message, and dispatches the rest.
//!
//! `Bot` also implements `tower::Service<Update>`, so middleware can wrap
//! the whole pipeline:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let service = ServiceBuilder::new()
//!     .concurrency_limit(16)
//!     .service(bot);
//! let report = service.oneshot(update).await?;
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use courier_core::{BoxedApi, Update, UpdateHandler};
use futures::future::BoxFuture;
use tower::Service;
use tracing::trace;

use crate::dispatcher::{DispatchReport, Dispatcher};

#[derive(Clone)]
pub struct Bot {
    dispatcher: Dispatcher,
    api: BoxedApi,
}

impl Bot {
    pub fn new(dispatcher: Dispatcher, api: BoxedApi) -> Self {
        Self { dispatcher, api }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn api(&self) -> &BoxedApi {
        &self.api
    }

    /// Dispatches the update's message. Returns `None` when there is none.
    pub async fn process(&self, update: Update) -> Option<DispatchReport> {
        let Some(message) = update.message else {
            trace!(update_id = update.update_id, "Update carries no classified message");
            return None;
        };
        Some(self.dispatcher.dispatch(Arc::new(message), &self.api).await)
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UpdateHandler for Bot {
    async fn handle_update(&self, update: Update) {
        self.process(update).await;
    }
}

impl Service<Update> for Bot {
    type Response = Option<DispatchReport>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, update: Update) -> Self::Future {
        let bot = self.clone();
        Box::pin(async move { Ok(bot.process(update).await) })
    }
}

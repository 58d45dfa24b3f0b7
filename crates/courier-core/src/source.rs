//! The seam between update delivery and update processing.
//!
//! An [`UpdateSource`] pulls or receives updates and hands each one to an
//! [`UpdateHandler`]. Sources never look inside the update beyond its id;
//! handlers never know how the update arrived.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TransportResult;
use crate::model::Update;

/// Consumes decoded updates.
#[async_trait]
pub trait UpdateHandler: Send + Sync {
    /// Processes one update. Returns once processing has finished.
    async fn handle_update(&self, update: Update);
}

/// A shared, type-erased update handler.
pub type BoxedUpdateHandler = Arc<dyn UpdateHandler>;

/// Delivers updates until told to stop.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs until `shutdown` is cancelled.
    ///
    /// Returns an error only when the source cannot start at all; failures
    /// while running are logged and retried.
    async fn run(
        &self,
        handler: BoxedUpdateHandler,
        shutdown: CancellationToken,
    ) -> TransportResult<()>;
}

/// A shared, type-erased update source.
pub type BoxedUpdateSource = Arc<dyn UpdateSource>;

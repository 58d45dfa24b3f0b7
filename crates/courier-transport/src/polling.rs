//! Long-poll update source.
//!
//! One task, one `getUpdates` call in flight. Each returned update is
//! dispatched and awaited before the next one, and the cursor only moves
//! past updates that were handed to the handler (or could not be decoded).
//! A crash between dispatch and the next poll therefore redelivers, never
//! skips. Shutdown is checked between updates, so the undelivered rest of a
//! batch is fetched again on the next start.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::{
    BoxedApi, BoxedUpdateHandler, GetUpdates, TransportResult, Update, UpdateSource,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::backoff::{Backoff, BackoffPolicy};

/// Default long-poll timeout.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Tracks the next update id to request.
///
/// An offset of zero means "no offset": the server returns everything it
/// still holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollCursor {
    offset: i64,
}

impl PollCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a known offset, e.g. one persisted by the application.
    pub fn starting_at(offset: i64) -> Self {
        Self { offset }
    }

    /// The offset to send, `None` until the first update was seen.
    pub fn offset(&self) -> Option<i64> {
        (self.offset != 0).then_some(self.offset)
    }

    /// Moves past `update_id`. Never moves backwards.
    pub fn advance(&mut self, update_id: i64) {
        self.offset = self.offset.max(update_id.saturating_add(1));
    }
}

/// Polling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingOptions {
    pub timeout: Duration,
    pub backoff: BackoffPolicy,
    pub start: PollCursor,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            backoff: BackoffPolicy::default(),
            start: PollCursor::new(),
        }
    }
}

/// Pulls updates with `getUpdates`.
pub struct PollingSource {
    api: BoxedApi,
    options: PollingOptions,
}

impl PollingSource {
    pub fn new(api: BoxedApi, options: PollingOptions) -> Self {
        Self { api, options }
    }

    /// Decodes and dispatches one batch, advancing the cursor per update.
    /// Stops early once `shutdown` fires.
    async fn deliver(
        &self,
        batch: Vec<Value>,
        handler: &BoxedUpdateHandler,
        cursor: &mut PollCursor,
        shutdown: &CancellationToken,
    ) {
        for raw in batch {
            if shutdown.is_cancelled() {
                debug!(next_offset = ?cursor.offset(), "Shutdown requested, leaving rest of batch");
                break;
            }
            let update_id = raw.get("update_id").and_then(Value::as_i64);

            match serde_json::from_value::<Update>(raw) {
                Ok(update) => {
                    let update_id = update.update_id;
                    trace!(update_id, "Dispatching update");
                    handler.handle_update(update).await;
                    cursor.advance(update_id);
                }
                Err(e) => match update_id {
                    Some(update_id) => {
                        warn!(update_id, error = %e, "Skipping undecodable update");
                        cursor.advance(update_id);
                    }
                    None => warn!(error = %e, "Skipping update without an id"),
                },
            }
        }
    }
}

#[async_trait]
impl UpdateSource for PollingSource {
    fn name(&self) -> &'static str {
        "polling"
    }

    async fn run(&self, handler: BoxedUpdateHandler, shutdown: CancellationToken) -> TransportResult<()> {
        // getUpdates is refused while a webhook is registered.
        if let Err(e) = self.api.delete_webhook().await {
            warn!(error = %e, "Failed to delete webhook, polling may be refused");
        }

        let mut cursor = self.options.start;
        let mut backoff = Backoff::new(self.options.backoff);
        info!(timeout = ?self.options.timeout, "Polling for updates");

        loop {
            let request = GetUpdates {
                timeout: self.options.timeout.as_secs(),
                offset: cursor.offset(),
            };

            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.api.get_updates(request) => result,
            };

            match result {
                Ok(batch) => {
                    backoff.reset();
                    if batch.is_empty() {
                        trace!("Empty poll");
                        continue;
                    }
                    debug!(count = batch.len(), offset = ?request.offset, "Received updates");
                    self.deliver(batch, &handler, &mut cursor, &shutdown).await;
                }
                Err(e) => {
                    let delay = backoff.next_delay();
                    warn!(error = %e, retry_in = ?delay, "Polling failed");
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        info!("Polling stopped");
        Ok(())
    }
}

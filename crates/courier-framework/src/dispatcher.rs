//! Ordered, cancellable message dispatch.
//!
//! Handlers are registered against a [`TypeMatcher`] on a
//! [`DispatcherBuilder`] and frozen into a [`Dispatcher`] by `build()`.
//! For every message the dispatcher:
//!
//! 1. Wraps it in a fresh [`MessageEvent`]
//! 2. Walks the registrations in order, invoking each handler whose matcher
//!    accepts the message
//! 3. Stops as soon as the event is cancelled after an invocation
//!
//! Handler errors and panics are logged and counted; they never stop the
//! scan or change the cancellation flag.
//!
//! ```rust,ignore
//! use courier_framework::{DispatcherBuilder, MessageType, CommandFilter};
//!
//! let dispatcher = DispatcherBuilder::new()
//!     .register(MessageType::COMMAND, CommandFilter::new("echo", echo))
//!     .register(MessageType::ANY, logger)
//!     .build();
//! ```

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use courier_core::{BoxedApi, Message};
use futures::FutureExt;
use tracing::{Instrument, debug, debug_span, error, trace, warn};

use crate::event::MessageEvent;
use crate::handler::{BoxedHandler, MessageHandler};
use crate::matcher::{Category, TypeMatcher};

/// A handler bound to the matcher that gates it.
#[derive(Clone)]
pub struct Registration {
    pub matcher: TypeMatcher,
    pub handler: BoxedHandler,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Collects registrations before they are frozen.
#[derive(Default, Clone, Debug)]
pub struct DispatcherBuilder {
    registrations: Vec<Registration>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler. Registration order is dispatch order.
    pub fn register(mut self, matcher: &TypeMatcher, handler: impl MessageHandler + 'static) -> Self {
        self.add(matcher, handler);
        self
    }

    /// Appends a handler through a mutable reference.
    pub fn add(&mut self, matcher: &TypeMatcher, handler: impl MessageHandler + 'static) -> &mut Self {
        self.registrations.push(Registration {
            matcher: *matcher,
            handler: Arc::new(handler),
        });
        self
    }

    /// Returns the number of registrations collected so far.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Freezes the current registrations.
    ///
    /// The builder stays usable; later registrations do not affect
    /// dispatchers that were already built.
    pub fn build(&self) -> Dispatcher {
        Dispatcher {
            registrations: self.registrations.iter().cloned().collect(),
        }
    }
}

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Registrations whose matcher was evaluated.
    pub visited: usize,
    /// Handlers that were invoked.
    pub invoked: usize,
    /// Invoked handlers that returned an error or panicked.
    pub failed: usize,
    /// Whether the event ended cancelled.
    pub cancelled: bool,
}

/// An immutable, cheaply cloneable registry of handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registrations: Arc<[Registration]>,
}

impl Dispatcher {
    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Routes one message through the registry.
    pub async fn dispatch(&self, message: Arc<Message>, api: &BoxedApi) -> DispatchReport {
        let span = debug_span!(
            "dispatch",
            message_id = message.message_id,
            chat_id = message.chat_id(),
            category = ?Category::of(&message),
        );

        async move {
            let mut event = MessageEvent::new(message);
            let mut report = DispatchReport::default();

            for (index, registration) in self.registrations.iter().enumerate() {
                report.visited += 1;

                if !registration.matcher.matches(event.message()) {
                    trace!(index, "Matcher rejected message");
                    continue;
                }

                trace!(index, "Invoking handler");
                report.invoked += 1;

                let outcome = AssertUnwindSafe(registration.handler.handle(&mut event, api))
                    .catch_unwind()
                    .await;

                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        report.failed += 1;
                        warn!(index, error = %e, "Handler failed");
                    }
                    Err(panic) => {
                        report.failed += 1;
                        error!(index, panic = panic_message(&*panic), "Handler panicked");
                    }
                }

                if event.is_cancelled() {
                    debug!(index, "Event cancelled, stopping dispatch");
                    break;
                }
            }

            report.cancelled = event.is_cancelled();
            debug!(
                visited = report.visited,
                invoked = report.invoked,
                failed = report.failed,
                cancelled = report.cancelled,
                "Dispatch finished"
            );
            report
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registration_count", &self.registrations.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::bail;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::matcher::MessageType;
    use crate::testing::{RecordingApi, text_message};

    /// Appends its tag to a shared log, then applies its cancellation action.
    struct Probe {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        action: Action,
    }

    #[derive(Clone, Copy)]
    enum Action {
        Pass,
        Cancel,
        Uncancel,
        Fail,
        Panic,
    }

    #[async_trait]
    impl MessageHandler for Probe {
        async fn handle(&self, event: &mut MessageEvent, _api: &BoxedApi) -> anyhow::Result<()> {
            self.log.lock().push(self.tag);
            match self.action {
                Action::Pass => Ok(()),
                Action::Cancel => {
                    event.cancel();
                    Ok(())
                }
                Action::Uncancel => {
                    event.set_cancelled(false);
                    Ok(())
                }
                Action::Fail => bail!("probe {} failed", self.tag),
                Action::Panic => panic!("probe {} panicked", self.tag),
            }
        }
    }

    fn probe(tag: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, action: Action) -> Probe {
        Probe {
            tag,
            log: Arc::clone(log),
            action,
        }
    }

    fn api() -> BoxedApi {
        Arc::new(RecordingApi::new())
    }

    #[tokio::test]
    async fn test_dispatch_empty_registry() {
        let report = DispatcherBuilder::new()
            .build()
            .dispatch(Arc::new(text_message(1, "hi")), &api())
            .await;
        assert_eq!(report, DispatchReport::default());
    }

    #[tokio::test]
    async fn test_matching_handlers_run_in_order() {
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, probe("a", &log, Action::Pass))
            .register(MessageType::COMMAND, probe("b", &log, Action::Pass))
            .register(MessageType::TEXT, probe("c", &log, Action::Pass))
            .build();

        let report = dispatcher
            .dispatch(Arc::new(text_message(1, "hi")), &api())
            .await;

        assert_eq!(*log.lock(), ["a", "c"]);
        assert_eq!(report.visited, 3);
        assert_eq!(report.invoked, 2);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_cancel_stops_later_handlers() {
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, probe("first", &log, Action::Cancel))
            .register(MessageType::ANY, probe("second", &log, Action::Pass))
            .build();

        let report = dispatcher
            .dispatch(Arc::new(text_message(1, "hi")), &api())
            .await;

        assert_eq!(*log.lock(), ["first"]);
        assert_eq!(report.visited, 1);
        assert!(report.cancelled);
    }

    #[tokio::test]
    async fn test_handlers_see_fresh_event_per_dispatch() {
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, probe("a", &log, Action::Cancel))
            .build();

        dispatcher.dispatch(Arc::new(text_message(1, "x")), &api()).await;
        dispatcher.dispatch(Arc::new(text_message(2, "y")), &api()).await;

        assert_eq!(*log.lock(), ["a", "a"]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_scan() {
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, probe("err", &log, Action::Fail))
            .register(MessageType::ANY, probe("panic", &log, Action::Panic))
            .register(MessageType::ANY, probe("ok", &log, Action::Pass))
            .build();

        let report = dispatcher
            .dispatch(Arc::new(text_message(1, "hi")), &api())
            .await;

        assert_eq!(*log.lock(), ["err", "panic", "ok"]);
        assert_eq!(report.invoked, 3);
        assert_eq!(report.failed, 2);
    }

    #[tokio::test]
    async fn test_uncancel_resumes_routing() {
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, probe("cancel", &log, Action::Cancel))
            .register(MessageType::ANY, probe("never", &log, Action::Pass))
            .build();
        dispatcher.dispatch(Arc::new(text_message(1, "hi")), &api()).await;
        assert_eq!(*log.lock(), ["cancel"]);

        // A handler that cancels and then clears the flag within its own call
        // lets routing continue.
        struct Toggle(Arc<AtomicUsize>);

        #[async_trait]
        impl MessageHandler for Toggle {
            async fn handle(&self, event: &mut MessageEvent, _api: &BoxedApi) -> anyhow::Result<()> {
                event.cancel();
                event.set_cancelled(false);
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let log = Arc::default();
        let dispatcher = DispatcherBuilder::new()
            .register(MessageType::ANY, Toggle(Arc::clone(&count)))
            .register(MessageType::ANY, probe("after", &log, Action::Uncancel))
            .build();
        let report = dispatcher.dispatch(Arc::new(text_message(1, "hi")), &api()).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*log.lock(), ["after"]);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_built_dispatcher_is_frozen() {
        let log = Arc::default();
        let mut builder = DispatcherBuilder::new();
        builder.add(MessageType::ANY, probe("early", &log, Action::Pass));
        let dispatcher = builder.build();
        builder.add(MessageType::ANY, probe("late", &log, Action::Pass));

        dispatcher.dispatch(Arc::new(text_message(1, "hi")), &api()).await;

        assert_eq!(dispatcher.len(), 1);
        assert_eq!(builder.len(), 2);
        assert_eq!(*log.lock(), ["early"]);
    }

    #[test]
    fn test_dispatcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher>();
    }
}

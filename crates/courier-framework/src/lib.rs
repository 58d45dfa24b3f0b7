//! # Courier Framework
//!
//! Routing layer of the Courier bot framework.
//!
//! This layer provides:
//! - [`TypeMatcher`] and the [`MessageType`] catalog for structural filtering
//! - The [`MessageHandler`] trait and the [`handler_fn`] closure adapter
//! - The ordered, cancellable [`Dispatcher`]
//! - Command routing with argument validation and generated help
//!   ([`command`])
//! - [`Bot`], binding a dispatcher to an API client as an
//!   [`UpdateHandler`](courier_core::UpdateHandler) and a tower `Service`

pub mod bot;
pub mod command;
pub mod dispatcher;
pub mod event;
pub mod handler;
pub mod matcher;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bot::Bot;
pub use command::{Argument, CommandFilter, CommandSignature, HelpHandler, ValidatingCommandFilter};
pub use dispatcher::{DispatchReport, Dispatcher, DispatcherBuilder, Registration};
pub use event::MessageEvent;
pub use handler::{BoxedHandler, HandlerFn, MessageHandler, handler_fn};
pub use matcher::{Category, MessageType, TypeMatcher};

//! Courier Runtime - configuration, logging and lifecycle for Courier bots.
//!
//! This crate provides:
//! - Layered configuration (`courier.toml`, `COURIER_*` environment variables)
//! - Logging setup from that configuration
//! - [`CourierRuntime`], which connects a dispatcher to the configured
//!   update source and runs it until shutdown
//!
//! ```ignore
//! use courier_framework::{DispatcherBuilder, MessageType};
//! use courier_runtime::CourierRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = CourierRuntime::builder().build()?;
//!
//!     let dispatcher = DispatcherBuilder::new()
//!         .register(MessageType::TEXT, echo)
//!         .build();
//!
//!     // Runs until Ctrl+C
//!     runtime.run(dispatcher).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, CourierConfig, DeliveryConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{CourierRuntime, RuntimeBuilder, run_source};

// Re-export tracing for use by bot crates
pub use tracing;

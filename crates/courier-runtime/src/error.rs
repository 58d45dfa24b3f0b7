//! Runtime error types.

use courier_core::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running a bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The update source stopped with an error.
    #[error("Update source failed: {0}")]
    Transport(#[from] TransportError),

    /// The update source task panicked or was aborted.
    #[error("Update source task failed: {0}")]
    TaskFailed(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

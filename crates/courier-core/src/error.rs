//! Error types shared across the Courier crates.
//!
//! Handler-level failures are plain `anyhow::Error`s and live in
//! `courier-framework`; the runtime defines its own configuration errors.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors raised while talking to the network below the Bot API.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {reason}")]
    BindFailed {
        /// The address that could not be bound.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// An HTTP request failed before a response arrived.
    #[error("request to {url} failed: {reason}")]
    RequestFailed {
        /// The request URL, with the bot token redacted.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The server answered with a body that could not be read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for Bot API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The API answered `ok: false`.
    #[error("Bot API error ({code}): {description}")]
    Rejected { code: i64, description: String },
    /// The API answered `ok: true` without a `result`.
    #[error("Bot API response for '{method}' carried no result")]
    MissingResult { method: &'static str },
    /// The certificate file could not be read.
    #[error("failed to read certificate '{path}': {reason}")]
    Certificate { path: String, reason: String },
    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for Bot API calls.
pub type ApiResult<T> = Result<T, ApiError>;

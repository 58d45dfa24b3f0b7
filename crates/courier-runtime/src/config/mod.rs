//! Layered TOML and environment configuration.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ENV_PREFIX, Profile, load_config, load_config_from_file};
pub use schema::{
    BackoffConfig, BotSettings, CourierConfig, DeliveryConfig, LogFormat, LogLevel, LogOutput,
    LogRotation, LoggingConfig, PollingConfig, SpanEventConfig, WebhookConfig,
};
pub use validation::{MAX_POLL_TIMEOUT_SECS, validate_config};

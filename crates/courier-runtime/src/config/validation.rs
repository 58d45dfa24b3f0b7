//! Configuration validation.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BackoffConfig, BotSettings, CourierConfig, DeliveryConfig, WebhookConfig};

/// Upper bound for the long-poll timeout.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration.
pub fn validate_config(config: &CourierConfig) -> ConfigResult<()> {
    validate_bot(&config.bot)?;
    match &config.delivery {
        DeliveryConfig::Polling(polling) => {
            if polling.timeout_secs == 0 {
                return Err(ConfigError::validation(
                    "Polling timeout must be greater than 0",
                ));
            }
            if polling.timeout_secs > MAX_POLL_TIMEOUT_SECS {
                return Err(ConfigError::validation(format!(
                    "Polling timeout must be at most {MAX_POLL_TIMEOUT_SECS} seconds"
                )));
            }
            validate_backoff(&polling.backoff)?;
        }
        DeliveryConfig::Webhook(webhook) => validate_webhook(webhook)?,
    }
    Ok(())
}

fn validate_bot(bot: &BotSettings) -> ConfigResult<()> {
    if bot.token.trim().is_empty() {
        return Err(ConfigError::missing_field("bot.token"));
    }
    validate_url(&bot.api_url)?;
    if bot.request_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "Request timeout must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_backoff(backoff: &BackoffConfig) -> ConfigResult<()> {
    if backoff.initial_delay_ms == 0 {
        return Err(ConfigError::validation(
            "Initial backoff delay must be greater than 0",
        ));
    }

    if backoff.max_delay_ms < backoff.initial_delay_ms {
        return Err(ConfigError::validation(
            "Max backoff delay must be greater than or equal to initial delay",
        ));
    }

    if backoff.multiplier < 1.0 {
        return Err(ConfigError::validation(
            "Backoff multiplier must be at least 1.0",
        ));
    }

    Ok(())
}

fn validate_webhook(webhook: &WebhookConfig) -> ConfigResult<()> {
    webhook.listen_addr()?;

    if !webhook.path.starts_with('/') {
        return Err(ConfigError::validation("Webhook path must start with '/'"));
    }

    if let Some(url) = &webhook.public_url {
        validate_url(url)?;
    }

    // Telegram only sends A-Z, a-z, 0-9, _ and - in this header.
    if let Some(secret) = &webhook.secret_token {
        let valid = !secret.is_empty()
            && secret.len() <= 256
            && secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ConfigError::validation(
                "Secret token must be 1-256 characters of A-Z, a-z, 0-9, '_' or '-'",
            ));
        }
    }

    Ok(())
}

fn validate_url(url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field("url"));
    }

    let valid_schemes = ["http://", "https://"];
    if !valid_schemes.iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {valid_schemes:?}"),
        ));
    }

    Ok(())
}

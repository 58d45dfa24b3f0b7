//! Bot lifecycle.
//!
//! The runtime turns a [`CourierConfig`] into a running bot: it builds the
//! HTTP client, wraps the dispatcher in a [`Bot`], starts the configured
//! update source on its own task and stops it on shutdown.
//!
//! ```rust,ignore
//! use courier_runtime::CourierRuntime;
//!
//! let runtime = CourierRuntime::builder()
//!     .config_file("courier.toml")
//!     .build()?;
//! runtime.run(dispatcher).await?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use courier_core::{BoxedApi, BoxedUpdateHandler, BoxedUpdateSource};
use courier_framework::{Bot, Dispatcher};
use courier_transport::{HttpBotApi, PollingSource, WebhookSource};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{ConfigLoader, ConfigResult, CourierConfig, DeliveryConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Runs one bot from configuration.
#[derive(Debug, Clone)]
pub struct CourierRuntime {
    config: CourierConfig,
}

impl CourierRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Validates the configuration and initializes logging from it.
    pub fn from_config(config: CourierConfig) -> ConfigResult<Self> {
        config.validate()?;
        logging::init_from_config(&config.logging);

        info!(
            mode = config.delivery.mode(),
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self { config })
    }

    pub fn config(&self) -> &CourierConfig {
        &self.config
    }

    /// Builds the Bot API client described by the configuration.
    pub fn api(&self) -> RuntimeResult<BoxedApi> {
        let bot = &self.config.bot;
        let api = HttpBotApi::builder(bot.token.clone())
            .api_url(bot.api_url.clone())
            .timeout(bot.request_timeout())
            .build()?;
        Ok(Arc::new(api))
    }

    /// Builds the update source for the configured delivery mode.
    pub fn source(&self, api: BoxedApi) -> RuntimeResult<BoxedUpdateSource> {
        let source: BoxedUpdateSource = match &self.config.delivery {
            DeliveryConfig::Polling(polling) => {
                Arc::new(PollingSource::new(api, polling.to_options()))
            }
            DeliveryConfig::Webhook(webhook) => {
                Arc::new(WebhookSource::new(api, webhook.to_options()?))
            }
        };
        Ok(source)
    }

    /// Runs until Ctrl+C or SIGTERM.
    pub async fn run(&self, dispatcher: Dispatcher) -> RuntimeResult<()> {
        info!("Courier is running. Press Ctrl+C to stop.");
        self.run_until(dispatcher, wait_for_shutdown()).await
    }

    /// Runs until `shutdown` completes.
    pub async fn run_until<F>(&self, dispatcher: Dispatcher, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let api = self.api()?;
        let source = self.source(api.clone())?;
        run_source(dispatcher, api, source, shutdown).await
    }
}

/// Drives `source` into a [`Bot`] until `shutdown` completes or the source
/// stops on its own.
///
/// A source that fails (for example a webhook that cannot bind) ends the run
/// with its error without waiting for `shutdown`.
pub async fn run_source<F>(
    dispatcher: Dispatcher,
    api: BoxedApi,
    source: BoxedUpdateSource,
    shutdown: F,
) -> RuntimeResult<()>
where
    F: Future<Output = ()>,
{
    match api.get_me().await {
        Ok(me) => info!(
            bot_id = me.id,
            username = me.username.as_deref().unwrap_or_default(),
            "Connected to Bot API"
        ),
        Err(e) => warn!(error = %e, "Could not identify bot"),
    }

    let name = source.name();
    let bot: BoxedUpdateHandler = Arc::new(Bot::new(dispatcher, api));
    let token = CancellationToken::new();

    let mut task = tokio::spawn({
        let token = token.clone();
        async move { source.run(bot, token).await }
    });
    info!(source = name, "Update source started");

    let joined = tokio::select! {
        joined = &mut task => {
            warn!(source = name, "Update source stopped before shutdown");
            joined
        }
        () = shutdown => {
            info!(source = name, "Shutting down");
            token.cancel();
            task.await
        }
    };

    match joined {
        Ok(Ok(())) => {
            info!(source = name, "Update source stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(source = name, error = %e, "Update source failed");
            Err(e.into())
        }
        Err(e) => Err(RuntimeError::TaskFailed(e.to_string())),
    }
}

/// Waits for Ctrl+C, or SIGTERM on unix.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
        return;
    }
    info!("Received Ctrl+C");
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a [`CourierRuntime`].
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Searches the current directory and the user config directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir().with_user_config_dir(),
        }
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges a programmatic base configuration.
    pub fn merge(mut self, config: CourierConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub fn build(self) -> ConfigResult<CourierRuntime> {
        CourierRuntime::from_config(self.config_loader.load()?)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use courier_core::TransportError;
    use courier_framework::testing::{ApiCall, RecordingApi};
    use courier_framework::{DispatcherBuilder, MessageType, handler_fn};
    use serde_json::json;

    use super::*;
    use crate::config::{PollingConfig, WebhookConfig};

    fn config(delivery: DeliveryConfig) -> CourierConfig {
        let mut config = CourierConfig {
            delivery,
            ..Default::default()
        };
        config.bot.token = "123:abc".into();
        config
    }

    fn echo() -> Dispatcher {
        DispatcherBuilder::new()
            .register(
                MessageType::TEXT,
                handler_fn(|event, api| {
                    Box::pin(async move {
                        let message = event.message();
                        let text = message.text().unwrap_or_default().to_string();
                        api.send_text(message.chat_id(), &text, None).await?;
                        Ok(())
                    })
                }),
            )
            .build()
    }

    #[test]
    fn test_from_config_validates() {
        let result = CourierRuntime::from_config(CourierConfig::default());
        assert!(result.is_err());

        let runtime =
            CourierRuntime::from_config(config(DeliveryConfig::default())).unwrap();
        assert_eq!(runtime.config().bot.token, "123:abc");
    }

    #[tokio::test]
    async fn test_polling_run_until_shutdown() {
        let runtime = CourierRuntime::from_config(config(DeliveryConfig::Polling(
            PollingConfig::default(),
        )))
        .unwrap();

        let api = Arc::new(RecordingApi::new());
        api.push_updates(vec![json!({
            "update_id": 1,
            "message": {
                "message_id": 5,
                "date": 0,
                "chat": {"id": 77, "type": "private"},
                "text": "ping",
            },
        })]);

        let source = runtime.source(api.clone()).unwrap();
        assert_eq!(source.name(), "polling");

        let shutdown = {
            let api = api.clone();
            async move {
                while api.sent().is_empty() {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            }
        };
        run_source(echo(), api.clone(), source, shutdown).await.unwrap();

        let sent = api.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 77);
        assert_eq!(sent[0].text, "ping");
        assert_eq!(api.calls()[..2], [ApiCall::GetMe, ApiCall::DeleteWebhook]);
    }

    #[tokio::test]
    async fn test_failed_source_ends_run() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let runtime = CourierRuntime::from_config(config(DeliveryConfig::Webhook(
            WebhookConfig {
                listen: addr.to_string(),
                ..Default::default()
            },
        )))
        .unwrap();

        let api = Arc::new(RecordingApi::new());
        let source = runtime.source(api.clone()).unwrap();
        assert_eq!(source.name(), "webhook");

        let result = run_source(echo(), api, source, std::future::pending()).await;
        assert!(matches!(
            result,
            Err(RuntimeError::Transport(TransportError::BindFailed { .. }))
        ));
    }

    #[test]
    fn test_builder_with_programmatic_config() {
        let mut base = CourierConfig::default();
        base.bot.token = "5:merged".into();

        let runtime = CourierRuntime::builder()
            .search_path("/nonexistent")
            .without_env()
            .merge(base)
            .build()
            .unwrap();
        assert_eq!(runtime.config().bot.token, "5:merged");
    }
}

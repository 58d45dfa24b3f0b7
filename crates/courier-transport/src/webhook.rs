//! Push update source.
//!
//! Serves `POST <path>` with a JSON [`Update`] body. Each request is
//! dispatched before the response is sent, so a `200` means the update was
//! handled. Malformed bodies are rejected by the `Json` extractor and never
//! reach the handler.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use courier_core::{
    BoxedApi, BoxedUpdateHandler, SetWebhook, TransportError, TransportResult, Update, UpdateSource,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Header carrying the secret registered with `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Webhook settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookOptions {
    /// Local address to listen on.
    pub listen: SocketAddr,
    /// Route path, starting with `/`.
    pub path: String,
    /// Public URL to register with `setWebhook`. Nothing is registered when
    /// absent.
    pub public_url: Option<String>,
    /// Self-signed certificate uploaded with the registration.
    pub certificate: Option<PathBuf>,
    /// Expected value of the secret token header.
    pub secret_token: Option<String>,
}

#[derive(Clone)]
struct WebhookState {
    handler: BoxedUpdateHandler,
    secret_token: Option<Arc<str>>,
}

/// Builds the webhook router. Exposed for embedding and tests.
pub fn router(handler: BoxedUpdateHandler, path: &str, secret_token: Option<&str>) -> Router {
    let state = WebhookState {
        handler,
        secret_token: secret_token.map(Arc::from),
    };
    Router::new()
        .route(path, post(receive))
        .with_state(state)
}

async fn receive(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if let Some(expected) = &state.secret_token {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if provided != expected.as_ref() {
            warn!(update_id = update.update_id, "Rejected webhook request with bad secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    debug!(update_id = update.update_id, "Webhook received update");
    state.handler.handle_update(update).await;
    StatusCode::OK
}

/// Receives updates over HTTP.
pub struct WebhookSource {
    api: BoxedApi,
    options: WebhookOptions,
}

impl WebhookSource {
    pub fn new(api: BoxedApi, options: WebhookOptions) -> Self {
        Self { api, options }
    }

    /// Serves on an already bound listener until `shutdown` fires.
    pub async fn serve(
        &self,
        listener: TcpListener,
        handler: BoxedUpdateHandler,
        shutdown: CancellationToken,
    ) -> TransportResult<()> {
        let app = router(
            handler,
            &self.options.path,
            self.options.secret_token.as_deref(),
        );

        info!(
            addr = %listener.local_addr()?,
            path = %self.options.path,
            "Webhook listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        info!("Webhook stopped");
        Ok(())
    }

    async fn register(&self) {
        let Some(url) = &self.options.public_url else {
            return;
        };

        let request = SetWebhook {
            url: url.clone(),
            certificate: self.options.certificate.clone(),
            secret_token: self.options.secret_token.clone(),
        };
        match self.api.set_webhook(request).await {
            Ok(()) => info!(url = %url, "Webhook registered"),
            Err(e) => error!(url = %url, error = %e, "Failed to register webhook"),
        }
    }
}

#[async_trait]
impl UpdateSource for WebhookSource {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn run(&self, handler: BoxedUpdateHandler, shutdown: CancellationToken) -> TransportResult<()> {
        let listener = TcpListener::bind(self.options.listen)
            .await
            .map_err(|e| TransportError::BindFailed {
                addr: self.options.listen.to_string(),
                reason: e.to_string(),
            })?;

        self.register().await;
        self.serve(listener, handler, shutdown).await
    }
}

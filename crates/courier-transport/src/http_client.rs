//! reqwest-backed Bot API client.
//!
//! Every call is a `POST <api_url>/bot<token>/<method>`. JSON bodies are
//! used throughout except for `setWebhook` with a certificate, which is
//! sent as multipart form data.

use std::time::Duration;

use async_trait::async_trait;
use courier_core::{
    ApiError, ApiResponse, ApiResult, BotApi, GetUpdates, SendMessage, SetWebhook,
    TransportError, TransportResult, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

/// The public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra time granted to `getUpdates` beyond its long-poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(15);

/// Sent message, as far as this client cares.
#[derive(serde::Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Builder for [`HttpBotApi`].
#[derive(Debug, Clone)]
pub struct HttpBotApiBuilder {
    token: String,
    api_url: String,
    timeout: Duration,
}

impl HttpBotApiBuilder {
    /// Overrides the API base URL, e.g. for a local Bot API server.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Timeout for ordinary calls. `getUpdates` derives its own from the
    /// long-poll timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> TransportResult<HttpBotApi> {
        let client = ClientBuilder::new()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        let api_url = self.api_url.trim_end_matches('/');
        Ok(HttpBotApi {
            client,
            base: format!("{api_url}/bot{}", self.token),
            display_base: format!("{api_url}/bot<token>"),
        })
    }
}

/// Bot API client over HTTPS.
#[derive(Clone)]
pub struct HttpBotApi {
    client: Client,
    base: String,
    /// `base` with the token redacted, for logs and errors.
    display_base: String,
}

impl HttpBotApi {
    pub fn builder(token: impl Into<String>) -> HttpBotApiBuilder {
        HttpBotApiBuilder {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Creates a client for the public endpoint with default settings.
    pub fn new(token: impl Into<String>) -> TransportResult<Self> {
        Self::builder(token).build()
    }

    fn request(&self, method: &str) -> RequestBuilder {
        self.client.post(format!("{}/{method}", self.base))
    }

    async fn call<T, B>(&self, method: &'static str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(method, self.request(method).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        trace!(method, "Calling Bot API");
        let url = format!("{}/{method}", self.display_base);

        let response = request.send().await.map_err(|e| TransportError::RequestFailed {
            url: url.clone(),
            reason: e.without_url().to_string(),
        })?;

        // Errors come back as non-2xx responses that still carry the
        // envelope, so the body is decoded regardless of status.
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TransportError::RequestFailed {
            url: url.clone(),
            reason: e.without_url().to_string(),
        })?;

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::InvalidResponse(format!("HTTP {} from {url}: {e}", status.as_u16()))
        })?;

        let result = envelope.into_result(method);
        if let Err(e) = &result {
            debug!(method, status = status.as_u16(), error = %e, "Bot API call failed");
        }
        result
    }

    async fn certificate_form(&self, request: &SetWebhook) -> ApiResult<Option<Form>> {
        let Some(path) = &request.certificate else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Certificate {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "certificate.pem".into());

        let mut form = Form::new()
            .text("url", request.url.clone())
            .part("certificate", Part::bytes(bytes).file_name(file_name));
        if let Some(secret) = &request.secret_token {
            form = form.text("secret_token", secret.clone());
        }
        Ok(Some(form))
    }
}

impl std::fmt::Debug for HttpBotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBotApi")
            .field("base", &self.display_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn get_me(&self) -> ApiResult<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    async fn send_message(&self, request: SendMessage) -> ApiResult<i64> {
        let sent: SentMessage = self.call("sendMessage", &request).await?;
        Ok(sent.message_id)
    }

    async fn get_updates(&self, request: GetUpdates) -> ApiResult<Vec<Value>> {
        let timeout = Duration::from_secs(request.timeout).saturating_add(POLL_GRACE);
        let builder = self.request("getUpdates").json(&request).timeout(timeout);
        self.execute("getUpdates", builder).await
    }

    async fn set_webhook(&self, request: SetWebhook) -> ApiResult<()> {
        let accepted: bool = match self.certificate_form(&request).await? {
            Some(form) => {
                let builder = self.request("setWebhook").multipart(form);
                self.execute("setWebhook", builder).await?
            }
            None => self.call("setWebhook", &request).await?,
        };
        debug!(accepted, "Webhook registered");
        Ok(())
    }

    async fn delete_webhook(&self) -> ApiResult<()> {
        let _: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;

    fn client(server: &Server) -> HttpBotApi {
        HttpBotApi::builder("123:abc")
            .api_url(server.url())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_me() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/getMe")
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"id": 7, "first_name": "Courier", "username": "courier_bot"}}"#)
            .create_async()
            .await;

        let me = client(&server).get_me().await.unwrap();
        assert_eq!(me.id, 7);
        assert_eq!(me.username.as_deref(), Some("courier_bot"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_body_and_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": 42,
                "text": "hi",
                "reply_to_message_id": 3,
            })))
            .with_body(r#"{"ok": true, "result": {"message_id": 99, "date": 0, "chat": {"id": 42, "type": "private"}}}"#)
            .create_async()
            .await;

        let id = client(&server).send_text(42, "hi", Some(3)).await.unwrap();
        assert_eq!(id, 99);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_updates_returns_raw_values() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/getUpdates")
            .match_body(Matcher::Json(json!({"timeout": 0, "offset": 5})))
            .with_body(r#"{"ok": true, "result": [{"update_id": 5}, {"update_id": 6, "bogus": true}]}"#)
            .create_async()
            .await;

        let updates = client(&server)
            .get_updates(GetUpdates {
                timeout: 0,
                offset: Some(5),
            })
            .await
            .unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1]["update_id"], 6);
    }

    #[tokio::test]
    async fn test_error_envelope_on_non_2xx() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/deleteWebhook")
            .with_status(401)
            .with_body(r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#)
            .create_async()
            .await;

        let err = client(&server).delete_webhook().await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { code: 401, .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/getMe")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client(&server).get_me().await.unwrap_err();
        match err {
            ApiError::Transport(TransportError::InvalidResponse(reason)) => {
                assert!(reason.contains("502"));
                assert!(!reason.contains("abc"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_result_shape_is_invalid_response() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/getMe")
            .with_body(r#"{"ok": true, "result": "not a user"}"#)
            .create_async()
            .await;

        let err = client(&server).get_me().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_get_updates_with_huge_timeout() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/getUpdates")
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let updates = client(&server)
            .get_updates(GetUpdates {
                timeout: u64::MAX,
                offset: None,
            })
            .await
            .unwrap();
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_set_webhook_without_certificate_is_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/setWebhook")
            .match_body(Matcher::Json(json!({"url": "https://example.org/hook"})))
            .with_body(r#"{"ok": true, "result": true}"#)
            .create_async()
            .await;

        client(&server)
            .set_webhook(SetWebhook::new("https://example.org/hook"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_webhook_uploads_certificate() {
        let dir = std::env::temp_dir().join(format!("courier-cert-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cert = dir.join("public.pem");
        std::fs::write(&cert, "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n").unwrap();

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/setWebhook")
            .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"certificate\"; filename=\"public.pem\"".into()),
                Matcher::Regex("https://example.org/hook".into()),
            ]))
            .with_body(r#"{"ok": true, "result": true}"#)
            .create_async()
            .await;

        let mut request = SetWebhook::new("https://example.org/hook");
        request.certificate = Some(cert);
        client(&server).set_webhook(request).await.unwrap();
        mock.assert_async().await;

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_certificate_file() {
        let server = Server::new_async().await;
        let mut request = SetWebhook::new("https://example.org/hook");
        request.certificate = Some("/nonexistent/courier.pem".into());

        let err = client(&server).set_webhook(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Certificate { .. }));
    }
}

//! HTTP plumbing shared by every resource module.
//!
//! Builds requests against the configured base URL, attaches the bearer
//! token, and turns non-2xx responses into [`ApiError::Api`] carrying the
//! server's message when it sent one.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::token::{TokenStore, TokenStoreError};

/// Message shown when the server gave nothing more specific.
pub const GENERIC_ERROR_MESSAGE: &str = "Algo deu errado. Tente novamente mais tarde.";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash, e.g. `http://host:3333`.
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the REST client layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {}", api_detail(.message, .body))]
    Api {
        status: u16,
        /// The `message` field of the error body, if present.
        message: Option<String>,
        /// Raw response body for debugging.
        body: String,
    },

    /// The request body could not be built.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// The bearer token could not be read or written.
    #[error(transparent)]
    Token(#[from] TokenStoreError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text for a toast: the server's own message for domain errors,
    /// otherwise a generic retry-later message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

fn api_detail<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

/// Pull `message` out of an error body. Validation pipes may send an array
/// of messages; the first one is used.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client with its own connection pool.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config, tokens))
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // ---- request helpers (used by the resource modules) ----

    /// Start a request to `path`, attaching `Authorization: Bearer <token>`
    /// when a token is stored. The store is consulted on every call.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.tokens.load()? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request and discard the body.
    pub(crate) async fn send_empty(builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        Self::ensure_success(builder.send().await?).await?;
        Ok(())
    }

    /// Return the response unchanged on 2xx, or an [`ApiError::Api`] with
    /// the status, extracted message and raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().path().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = extract_message(&body);
        tracing::warn!(
            status = status.as_u16(),
            path = %url,
            message = message.as_deref().unwrap_or(""),
            "Backend request failed",
        );
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_extracted_from_string_or_array() {
        assert_eq!(
            extract_message(r#"{"statusCode":409,"message":"Aluno já matriculado"}"#).as_deref(),
            Some("Aluno já matriculado")
        );
        assert_eq!(
            extract_message(r#"{"message":["name must be longer","x"]}"#).as_deref(),
            Some("name must be longer")
        );
        assert_eq!(extract_message("Internal Server Error"), None);
        assert_eq!(extract_message(r#"{"error":"x"}"#), None);
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = ApiError::Api {
            status: 409,
            message: Some("Aluno já matriculado".to_string()),
            body: String::new(),
        };
        assert_eq!(err.user_message(), "Aluno já matriculado");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn user_message_falls_back_to_generic() {
        let err = ApiError::Api {
            status: 500,
            message: None,
            body: "boom".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "API error (500): boom");

        let err = ApiError::Encode("bad".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:3333/");
        assert_eq!(config.base_url, "http://localhost:3333");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}

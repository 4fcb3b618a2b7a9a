use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{ChatReply, ChatRequest, Handoff};

/// Base URL used when neither the caller nor the environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the base URL.
pub const API_URL_ENV: &str = "SUPPORT_CHAT_API_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two calls the chat session makes against the support backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Base URL that relative asset locations are resolved against.
    fn base_url(&self) -> &Url;

    /// Submits a customer message and returns the agent's reply.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Fetches the pending human handoffs.
    async fn list_handoffs(&self) -> Result<Vec<Handoff>>;
}

/// HTTP client for the support backend.
#[derive(Debug, Clone)]
pub struct SupportApi {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl SupportApi {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// `SUPPORT_CHAT_API_URL` environment variable, falling back to
    /// `http://localhost:8000`.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process error responses and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // FastAPI reports failures as {"detail": ...}
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<serde_json::Value>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or(error_body);

        match status_code {
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message),
            _ => Error::api(status_code, message),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait]
impl Backend for SupportApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint("api/chat")?;
        debug!(conversation_id = %request.conversation_id, %url, "sending chat message");

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::read_json(response).await
    }

    async fn list_handoffs(&self) -> Result<Vec<Handoff>> {
        let url = self.endpoint("api/handoffs")?;
        debug!(%url, "fetching handoffs");

        let response = self
            .client
            .get(url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::read_json(response).await
    }
}

/// Parses a base URL, making sure it ends with `/` so endpoints join below it.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            "base URL must not be empty",
            Some("api_url".to_string()),
        ));
    }
    let mut url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(Error::validation(
            format!("{trimmed} cannot be used as a base URL"),
            Some("api_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

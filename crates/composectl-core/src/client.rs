//! API client for the Compose REST API
//!
//! [`ClientConfig`] holds everything that used to be process-wide: the base
//! URL, the bearer token, and the default headers. [`ComposeClient`] combines
//! it with a [`Transport`], so tests can swap the network out entirely.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::operation::{ApiRequest, Method};

/// Default API endpoint (versioned)
pub const DEFAULT_API_URL: &str = "https://api.compose.io/2016-07";

/// Environment variable supplying the bearer token
pub const TOKEN_ENV_VAR: &str = "COMPOSEAPITOKEN";

/// Environment variable overriding the API base URL
pub const URL_ENV_VAR: &str = "COMPOSE_API_URL";

/// User agent string for composectl HTTP requests
const COMPOSECTL_USER_AGENT: &str = concat!("composectl/", env!("CARGO_PKG_VERSION"));

/// Connection settings, read once and never mutated afterwards
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` sends an empty bearer token and lets the server reject it
    pub api_token: Option<String>,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            user_agent: COMPOSECTL_USER_AGENT.to_string(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Build from `COMPOSE_API_URL` and `COMPOSEAPITOKEN`
    pub fn from_env() -> Self {
        let base_url = std::env::var(URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(base_url);
        config.api_token = std::env::var(TOKEN_ENV_VAR).ok();
        config
    }

    /// Join a request path onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Headers sent with every request
    pub fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_token.as_deref().unwrap_or_default()),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ]
    }
}

/// Fully resolved request, as handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. An empty body is `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Turn a non-success response into a [`CoreError::Api`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = error_message(self.status, &self.body);
        Err(CoreError::Api {
            status: self.status,
            message,
        })
    }
}

/// Extract a readable message from an error response.
///
/// The API reports failures as `{"errors": ...}` where the payload is either
/// a string or an object of field errors.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(errors) = value.get("errors")
    {
        return match errors {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}

/// The network seam.
///
/// Production code uses [`HttpTransport`]; tests can record requests and
/// return canned responses without a socket.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(reqwest::Method::from(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!("HTTP {} ({} bytes)", status, body.len());

        Ok(ApiResponse { status, body })
    }
}

/// Authenticated client: configuration plus transport
#[derive(Clone)]
pub struct ComposeClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ComposeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ComposeClient {
    /// Create a client that talks HTTP
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Create a client on top of any transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a request descriptor against this client's configuration
    pub fn prepare(&self, request: &ApiRequest) -> PreparedRequest {
        PreparedRequest {
            method: request.method,
            url: self.config.url_for(&request.path),
            headers: self.config.default_headers(),
            body: request.body.clone(),
        }
    }

    /// Send a request; non-success statuses become [`CoreError::Api`]
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let prepared = self.prepare(request);
        debug!("{} {}", prepared.method, prepared.url);
        if let Some(body) = &prepared.body {
            trace!("Request body: {}", body);
        }
        if let Some(token) = &self.config.api_token {
            let prefix: String = token.chars().take(4).collect();
            trace!("Bearer token: {}...", prefix);
        }

        let response = self.transport.send(prepared).await?;
        debug!("Response status: {}", response.status);
        response.error_for_status()
    }

    /// Send a request and parse the body as JSON
    pub async fn execute_json(&self, request: &ApiRequest) -> Result<Value> {
        self.execute(request).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_cleanly() {
        let config = ClientConfig::new("https://api.compose.io/2016-07/");
        assert_eq!(
            config.url_for("/teams"),
            "https://api.compose.io/2016-07/teams"
        );
        assert_eq!(
            config.url_for("teams"),
            "https://api.compose.io/2016-07/teams"
        );
        assert_eq!(
            config.url_for("/accounts/"),
            "https://api.compose.io/2016-07/accounts/"
        );
    }

    #[test]
    fn test_default_headers_with_token() {
        let config = ClientConfig::default().with_token("secret");
        let headers = config.default_headers();
        assert!(headers.contains(&("Authorization".to_string(), "Bearer secret".to_string())));
        assert!(headers.contains(&(
            "Content-Type".to_string(),
            "application/json".to_string()
        )));
    }

    #[test]
    fn test_default_headers_without_token() {
        let config = ClientConfig::default();
        let headers = config.default_headers();
        assert!(headers.contains(&("Authorization".to_string(), "Bearer ".to_string())));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::default().with_token("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_empty_body_parses_as_null() {
        assert_eq!(ApiResponse::new(200, "").json().unwrap(), Value::Null);
        assert_eq!(ApiResponse::new(200, "  \n").json().unwrap(), Value::Null);
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = ApiResponse::new(200, "<html>").json().unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_error_for_status_uses_errors_string() {
        let err = ApiResponse::new(404, r#"{"errors":"deployment not found"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("deployment not found"));
    }

    #[test]
    fn test_error_for_status_uses_errors_object() {
        let err = ApiResponse::new(422, r#"{"errors":{"email":["is invalid"]}}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains(r#"{"email":["is invalid"]}"#));
    }

    #[test]
    fn test_error_for_status_empty_body_uses_reason() {
        let err = ApiResponse::new(401, "").error_for_status().unwrap_err();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_success_passes_through() {
        let response = ApiResponse::new(204, "").error_for_status().unwrap();
        assert_eq!(response.status, 204);
    }
}

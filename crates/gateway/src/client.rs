//! REST client for the tool gateway.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::protocol::{ErrorDetails, ExecuteRequest, GatewayResponse, Tool};
use crate::traits::{ToolCatalog, ToolInvoker};

/// Gateway location used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/mcp/api";

/// Default per-request timeout for gateway calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Configuration for a gateway connection.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }

    /// Send `X-API-Key` on every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Handle to a remote tool gateway.
///
/// Cheap to share: the underlying connection pool is reused across requests
/// and no other state is kept.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Build a client from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| Error::Config(format!("invalid gateway api key: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the gateway base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn tool_url(&self, name: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.url("/tools")).map_err(|e| Error::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("invalid gateway base url: {}", self.base_url)))?
            .push(name);
        Ok(url)
    }

    // --- Internal methods ---

    /// Send a request and decode the envelope. An empty or `null` body yields `None`.
    async fn send<T>(&self, request: RequestBuilder) -> Result<(StatusCode, Option<GatewayResponse<T>>)>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Unavailable(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok((status, None));
        }

        let envelope = serde_json::from_str::<Option<GatewayResponse<T>>>(&body).map_err(|e| {
            Error::Unavailable(format!("{status}: invalid gateway response: {e}"))
        })?;
        Ok((status, envelope))
    }
}

fn open<T>(envelope: Option<GatewayResponse<T>>) -> std::result::Result<T, ErrorDetails> {
    envelope.map_or_else(|| Err(ErrorDetails::empty_response()), GatewayResponse::into_data)
}

impl ToolCatalog for GatewayClient {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        let (_, envelope) = self.send(self.http.get(self.url("/tools"))).await?;
        open(envelope).map_err(|e| Error::Unavailable(format!("error getting tools: {e}")))
    }

    async fn get_tool(&self, name: &str) -> Result<Tool> {
        let (status, envelope) = self.send(self.http.get(self.tool_url(name)?)).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ToolNotFound(name.to_string()));
        }

        open(envelope).map_err(|e| {
            if e.is_not_found() {
                Error::ToolNotFound(name.to_string())
            } else {
                Error::Unavailable(format!("error getting tool information: {e}"))
            }
        })
    }

    async fn is_healthy(&self) -> bool {
        let envelope = match self.send::<Value>(self.http.get(self.url("/health"))).await {
            Ok((_, envelope)) => envelope,
            Err(e) => {
                error!(error = %e, "error checking gateway status");
                return false;
            }
        };

        match open(envelope) {
            Ok(data) => data.get("status").and_then(Value::as_str) == Some("ok"),
            Err(e) => {
                error!(error = %e, "gateway health check failed");
                false
            }
        }
    }
}

impl ToolInvoker for GatewayClient {
    async fn invoke(&self, tool_name: &str, parameters: &Map<String, Value>) -> Result<Value> {
        debug!(tool = tool_name, ?parameters, "executing tool");

        let request = ExecuteRequest {
            tool_name,
            parameters,
        };
        let (_, envelope) = self
            .send(self.http.post(self.url("/execute")).json(&request))
            .await?;

        open(envelope).map_err(|e| Error::execution(e.code, e.message))
    }
}

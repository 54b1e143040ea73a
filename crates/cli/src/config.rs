//! Configuration loading from toolproxy.toml.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use gateway::GatewayConfig;
use runtime::llm::{self, OpenAiBackend};
use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "toolproxy.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote tool gateway.
    #[serde(default)]
    pub gateway: GatewaySection,

    /// Chat model used for interpretation.
    #[serde(default)]
    pub llm: LlmSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize)]
pub struct GatewaySection {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    #[serde(default = "default_gateway_timeout")]
    pub timeout_ms: u64,

    /// Sent as `X-API-Key` when set.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LlmSection {
    /// Empty or placeholder keys select simulated interpretation.
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_llm_url")]
    pub base_url: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_ms: u64,
}

fn default_bind() -> String {
    "0.0.0.0:8081".to_string()
}

fn default_gateway_url() -> String {
    gateway::DEFAULT_BASE_URL.to_string()
}

fn default_gateway_timeout() -> u64 {
    gateway::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    llm::DEFAULT_TEMPERATURE
}

fn default_llm_url() -> String {
    llm::DEFAULT_BASE_URL.to_string()
}

fn default_llm_timeout() -> u64 {
    llm::DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            timeout_ms: default_gateway_timeout(),
            api_key: None,
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_llm_url(),
            timeout_ms: default_llm_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `OPENAI_API_KEY`, `TOOLPROXY_GATEWAY_URL`,
    /// `TOOLPROXY_GATEWAY_API_KEY` and `TOOLPROXY_BIND`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = var("TOOLPROXY_GATEWAY_URL") {
            self.gateway.base_url = url;
        }
        if let Some(key) = var("TOOLPROXY_GATEWAY_API_KEY") {
            self.gateway.api_key = Some(key);
        }
        if let Some(bind) = var("TOOLPROXY_BIND") {
            self.server.bind = bind;
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.server.bind.clone()))
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::new(&self.gateway.base_url)
            .with_timeout(Duration::from_millis(self.gateway.timeout_ms));
        if let Some(key) = &self.gateway.api_key {
            config = config.with_api_key(key);
        }
        config
    }

    /// Build the chat backend, or `None` when no usable API key is configured.
    pub fn llm_backend(&self) -> Result<Option<OpenAiBackend>, ConfigError> {
        let Some(api_key) = llm::resolve_api_key(self.llm.api_key.as_deref()) else {
            return Ok(None);
        };

        let backend = OpenAiBackend::builder(api_key, &self.llm.model)
            .temperature(self.llm.temperature)
            .base_url(&self.llm.base_url)
            .timeout(Duration::from_millis(self.llm.timeout_ms))
            .build()
            .map_err(|e| ConfigError::Llm(e.to_string()))?;
        Ok(Some(backend))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid bind address: {0}")]
    InvalidBind(String),

    #[error("invalid llm settings: {0}")]
    Llm(String),
}

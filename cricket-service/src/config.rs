//! Service and client configuration.
//!
//! Loaded once at startup and injected into the components that need it;
//! nothing here is mutated after load.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};

mod loader;

pub use loader::{load_config, parse_config};

/// Sample key published with the hosted service. Used only when no key is configured.
pub const DEFAULT_API_KEY: &str =
    "363de2d67a4682ccad32f87a398973014e499edc9ee82dca4f9c3ed6e6bf3829";

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_upstream")]
    pub upstream: UpstreamConfig,

    #[serde(default = "default_client")]
    pub client: ClientConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Hosted cricket AI service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Full URL for an upstream resource such as `/ask`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Headers sent with every upstream request
    pub fn headers(&self) -> ServiceResult<HeaderMap> {
        let api_key = HeaderValue::from_str(&self.api_key).map_err(|e| ServiceError::Config {
            message: format!("API key is not a valid header value: {}", e),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);
        Ok(headers)
    }

    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Conversation client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the proxy the client talks to
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Pause before a reply is shown
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

impl ClientConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

// ==================== Default Value Functions ====================

fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream() -> UpstreamConfig {
    UpstreamConfig {
        base_url: default_base_url(),
        api_key: default_api_key(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "https://cricket-chatbot-fyty.onrender.com".to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_client() -> ClientConfig {
    ClientConfig {
        proxy_url: default_proxy_url(),
        reply_delay_ms: default_reply_delay_ms(),
    }
}

fn default_proxy_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_reply_delay_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            upstream: default_upstream(),
            client: default_client(),
        }
    }
}

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{ServiceError, ServiceResult, UpstreamError};

/// Client for the hosted cricket AI service
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a new upstream client; the API key header is attached to every request
    pub fn new(config: UpstreamConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(config.headers()?)
            .build()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// POST a question to `/ask`
    pub async fn ask(&self, question: &str, query_type: &Value) -> Result<Value, UpstreamError> {
        let url = self.config.url("/ask");
        debug!(url = %url, query_type = %query_type, "Forwarding question upstream");

        let response = self
            .client
            .post(&url)
            .json(&AskBody {
                question,
                query_type,
            })
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.clone(),
                source: e,
            })?;

        Self::read_json(url, response).await
    }

    /// GET a resource such as `/quick-fact`
    pub async fn get(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = self.config.url(path);
        debug!(url = %url, "Fetching upstream resource");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.clone(),
                source: e,
            })?;

        Self::read_json(url, response).await
    }

    async fn read_json(url: String, response: Response) -> Result<Value, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse { url, source: e })
    }
}

#[derive(Debug, Serialize)]
struct AskBody<'a> {
    question: &'a str,
    query_type: &'a Value,
}

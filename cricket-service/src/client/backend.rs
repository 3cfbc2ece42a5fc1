//! How the conversation client reaches the proxy.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::proxy::{Quiz, Resource};

use super::state::Topic;

/// Client-side failures; the conversation only cares that the turn failed
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Proxy returned status {status}")]
    Status { status: u16 },

    #[error("Unreadable response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Proxy operations the conversation client can invoke
pub trait ProxyApi: Send + Sync + 'static {
    fn ask(
        &self,
        question: &str,
        topic: Topic,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;

    /// Text for a fact or joke
    fn fetch_text(
        &self,
        resource: Resource,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;

    fn quiz(&self) -> impl Future<Output = Result<Option<Quiz>, ClientError>> + Send;
}

/// [`ProxyApi`] over HTTP against the `/api` routes
pub struct HttpProxyApi {
    client: Client,
    base_url: String,
}

impl HttpProxyApi {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(
        url: String,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ClientError> {
        let response = response.map_err(|e| ClientError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode { url, source: e })
    }
}

impl ProxyApi for HttpProxyApi {
    async fn ask(&self, question: &str, topic: Topic) -> Result<String, ClientError> {
        let url = self.url("/ask");
        let response = self
            .client
            .post(&url)
            .json(&AskBody {
                question,
                query_type: topic,
            })
            .send()
            .await;

        let reply: AskReply = Self::read(url, response).await?;
        Ok(reply.response.unwrap_or_default())
    }

    async fn fetch_text(&self, resource: Resource) -> Result<String, ClientError> {
        let url = self.url(resource.path());
        let response = self.client.get(&url).send().await;

        let reply: TextReply = Self::read(url, response).await?;
        let text = match resource {
            Resource::Fact => reply.fact,
            Resource::Joke => reply.joke,
            Resource::Quiz => None,
        };
        Ok(text.unwrap_or_default())
    }

    async fn quiz(&self) -> Result<Option<Quiz>, ClientError> {
        let url = self.url(Resource::Quiz.path());
        let response = self.client.get(&url).send().await;

        let reply: QuizBody = Self::read(url, response).await?;
        Ok(reply.quiz)
    }
}

#[derive(Debug, Serialize)]
struct AskBody<'a> {
    question: &'a str,
    query_type: Topic,
}

#[derive(Debug, Deserialize)]
struct AskReply {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextReply {
    #[serde(default)]
    fact: Option<String>,
    #[serde(default)]
    joke: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    #[serde(default)]
    quiz: Option<Quiz>,
}

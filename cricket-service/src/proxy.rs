//! Proxy layer between chat clients and the hosted cricket AI service.
//!
//! Each operation makes at most one upstream call, coalesces the upstream's
//! inconsistent field names into one stable shape, and collapses upstream
//! failures into the categories of [`ServiceError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{error, warn};

use crate::config::UpstreamConfig;
use crate::error::{ServiceError, ServiceResult, UpstreamError};
use crate::upstream::UpstreamClient;

pub mod normalize;
mod quiz;

pub use quiz::{Quiz, QuizQuestion};

/// Topic sent as `query_type` when the caller does not pick one
pub const DEFAULT_TOPIC: &str = "general";

/// Fixed resources served without input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Fact,
    Joke,
    Quiz,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Fact => "fact",
            Resource::Joke => "joke",
            Resource::Quiz => "quiz",
        }
    }

    /// Path on the upstream service (and under `/api` on this one)
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Fact => "/quick-fact",
            Resource::Joke => "/cricket-joke",
            Resource::Quiz => "/cricket-quiz",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response for POST /api/ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for GET /api/quick-fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub fact: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for GET /api/cricket-joke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joke {
    pub joke: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for GET /api/cricket-quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReply {
    pub quiz: Quiz,
    pub timestamp: DateTime<Utc>,
}

pub struct CricketProxy {
    upstream: UpstreamClient,
}

impl CricketProxy {
    pub fn new(config: UpstreamConfig) -> ServiceResult<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(config)?,
        })
    }

    pub fn upstream_url(&self) -> &str {
        self.upstream.base_url()
    }

    /// Forward a question; only the trimmed text ever leaves this service
    ///
    /// `query_type` goes upstream unchanged, whatever its JSON type.
    pub async fn ask_question(
        &self,
        question: &str,
        query_type: impl Into<Value>,
    ) -> ServiceResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ServiceError::InvalidInput {
                message: "question is empty".to_string(),
            });
        }

        let data = self
            .upstream
            .ask(question, &query_type.into())
            .await
            .map_err(classify_ask_failure)?;

        Ok(Answer {
            response: normalize::answer_text(&data),
            timestamp: Utc::now(),
        })
    }

    pub async fn quick_fact(&self) -> ServiceResult<Fact> {
        let data = self.fetch(Resource::Fact).await?;
        Ok(Fact {
            fact: normalize::fact_text(&data),
            timestamp: Utc::now(),
        })
    }

    pub async fn joke(&self) -> ServiceResult<Joke> {
        let data = self.fetch(Resource::Joke).await?;
        Ok(Joke {
            joke: normalize::joke_text(&data),
            timestamp: Utc::now(),
        })
    }

    pub async fn quiz(&self) -> ServiceResult<QuizReply> {
        let data = self.fetch(Resource::Quiz).await?;
        Ok(QuizReply {
            quiz: normalize::quiz(&data),
            timestamp: Utc::now(),
        })
    }

    async fn fetch(&self, resource: Resource) -> ServiceResult<Value> {
        self.upstream
            .get(resource.path())
            .await
            .map_err(|source| {
                error!(resource = %resource, error = %source, "Cricket API error");
                ServiceError::Unavailable { resource, source }
            })
    }
}

fn classify_ask_failure(source: UpstreamError) -> ServiceError {
    if source.is_rate_limited() {
        warn!("Cricket API rate limit hit");
        return ServiceError::RateLimited;
    }

    if source.is_transport() {
        error!(error = %source, "Cricket API unreachable");
        return ServiceError::Connectivity(source);
    }

    match &source {
        UpstreamError::Status { status, reason } => {
            error!(status = *status, reason = %reason, "Cricket API error");
        }
        _ => error!(error = %source, "Cricket API returned an unreadable body"),
    }
    ServiceError::Upstream(source)
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::i18n::I18n;
use crate::proxy::Resource;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Upstream rate limit exceeded")]
    RateLimited,

    #[error("Upstream unreachable")]
    Connectivity(#[source] UpstreamError),

    #[error("Upstream request failed")]
    Upstream(#[source] UpstreamError),

    #[error("Unable to fetch cricket {resource}")]
    Unavailable {
        resource: Resource,
        #[source]
        source: UpstreamError,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Errors from the hosted cricket AI service.
///
/// Transport failures never reached an HTTP exchange; status failures did.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Connection failed to upstream at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream returned status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid response from upstream at {url}")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn is_transport(&self) -> bool {
        matches!(self, UpstreamError::Transport { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, UpstreamError::Status { status: 429, .. })
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "rateLimited", skip_serializing_if = "Option::is_none")]
    pub rate_limited: Option<bool>,
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Upstream(_)
            | ServiceError::Unavailable { .. }
            | ServiceError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput { .. } => "invalid_input",
            ServiceError::RateLimited => "rate_limited",
            ServiceError::Connectivity(_) => "connectivity",
            ServiceError::Upstream(_) => "upstream",
            ServiceError::Unavailable { .. } => "unavailable",
            ServiceError::Config { .. } => "config_error",
        }
    }

    /// Get a user-friendly translated message
    ///
    /// Upstream status codes and reasons are deliberately absent; they only
    /// reach the logs.
    pub fn user_message(&self, i18n: &I18n, locale: &str) -> String {
        match self {
            ServiceError::InvalidInput { .. } => i18n.get(locale, "error-question-required", None),
            ServiceError::RateLimited => i18n.get(locale, "error-rate-limited", None),
            ServiceError::Connectivity(_) => i18n.get(locale, "error-connectivity", None),
            ServiceError::Upstream(_) => i18n.get(locale, "error-ai-unavailable", None),
            ServiceError::Unavailable { resource, .. } => i18n.format(
                locale,
                "error-resource-unavailable",
                &[("resource", resource.as_str())],
            ),
            ServiceError::Config { .. } => i18n.get(locale, "error-internal", None),
        }
    }

    /// Convert to an error response with i18n support
    pub fn into_response_with_i18n(self, i18n: &I18n, locale: &str) -> Response {
        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(i18n, locale),
            rate_limited: matches!(self, ServiceError::RateLimited).then_some(true),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error wrapper with i18n support for API responses
pub struct I18nError {
    pub error: ServiceError,
    pub i18n: Arc<I18n>,
    pub locale: String,
}

impl I18nError {
    pub fn new(error: ServiceError, i18n: Arc<I18n>, locale: impl Into<String>) -> Self {
        Self {
            error,
            i18n,
            locale: locale.into(),
        }
    }
}

impl IntoResponse for I18nError {
    fn into_response(self) -> Response {
        self.error.into_response_with_i18n(&self.i18n, &self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid = ServiceError::InvalidInput {
            message: "empty".to_string(),
        };
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );

        let upstream = ServiceError::Upstream(UpstreamError::Status {
            status: 502,
            reason: "Bad Gateway".to_string(),
        });
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.error_code(), "upstream");
    }

    #[test]
    fn test_user_message_hides_upstream_detail() {
        let i18n = I18n::new();
        let error = ServiceError::Unavailable {
            resource: Resource::Quiz,
            source: UpstreamError::Status {
                status: 502,
                reason: "Bad Gateway".to_string(),
            },
        };

        let msg = error.user_message(&i18n, "en");
        assert_eq!(msg, "Unable to fetch cricket quiz at the moment.");
        assert!(!msg.contains("502"));
    }

    #[test]
    fn test_rate_limit_flag_serialization() {
        let limited = ErrorResponse {
            error: "slow down".to_string(),
            rate_limited: Some(true),
        };
        let json = serde_json::to_string(&limited).unwrap();
        assert!(json.contains(r#""rateLimited":true"#));

        let plain = ErrorResponse {
            error: "broken".to_string(),
            rate_limited: None,
        };
        let json = serde_json::to_string(&plain).unwrap();
        assert!(!json.contains("rateLimited")); // should be skipped when None
    }

    #[test]
    fn test_upstream_error_classification() {
        let limited = UpstreamError::Status {
            status: 429,
            reason: "Too Many Requests".to_string(),
        };
        assert!(limited.is_rate_limited());
        assert!(!limited.is_transport());
    }
}

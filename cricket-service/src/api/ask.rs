//! Question-asking endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::api::{AppState, record_outcome};
use crate::error::{I18nError, ServiceError, ServiceResult};
use crate::proxy::{Answer, DEFAULT_TOPIC};

/// Request body for POST /api/ask
///
/// Both fields are kept loose: a wrong `question` type is reported as invalid
/// input rather than as a body rejection, and `query_type` is forwarded as sent.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<Value>,
    #[serde(default)]
    pub query_type: Option<Value>,
}

/// POST /api/ask - forward a cricket question upstream
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<Answer>, I18nError> {
    let result = match question_and_topic(payload) {
        Ok((question, query_type)) => state.proxy.ask_question(&question, query_type).await,
        Err(e) => Err(e),
    };
    record_outcome("ask", &result);

    result.map(Json).map_err(|e| state.i18n_error(e))
}

fn question_and_topic(
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ServiceResult<(String, Value)> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected ask body");
        invalid_question()
    })?;

    let Some(Value::String(question)) = request.question else {
        return Err(invalid_question());
    };
    let query_type = request
        .query_type
        .unwrap_or_else(|| Value::from(DEFAULT_TOPIC));

    Ok((question, query_type))
}

fn invalid_question() -> ServiceError {
    ServiceError::InvalidInput {
        message: "question must be a string".to_string(),
    }
}

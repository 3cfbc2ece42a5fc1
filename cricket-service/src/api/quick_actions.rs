//! Quick-action endpoints: fact, joke and quiz.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::{AppState, record_outcome};
use crate::error::I18nError;
use crate::proxy::{Fact, Joke, QuizReply};

/// GET /api/quick-fact
pub async fn quick_fact_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Fact>, I18nError> {
    let result = state.proxy.quick_fact().await;
    record_outcome("quick_fact", &result);
    result.map(Json).map_err(|e| state.i18n_error(e))
}

/// GET /api/cricket-joke
pub async fn joke_handler(State(state): State<Arc<AppState>>) -> Result<Json<Joke>, I18nError> {
    let result = state.proxy.joke().await;
    record_outcome("cricket_joke", &result);
    result.map(Json).map_err(|e| state.i18n_error(e))
}

/// GET /api/cricket-quiz
pub async fn quiz_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuizReply>, I18nError> {
    let result = state.proxy.quiz().await;
    record_outcome("cricket_quiz", &result);
    result.map(Json).map_err(|e| state.i18n_error(e))
}

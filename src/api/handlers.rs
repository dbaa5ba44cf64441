use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::PipelineError;

use super::AppState;
use super::models::{AskRequest, AskResponse, ErrorResponse, HistoryResponse};
use super::session::SessionStore;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::EmptyQuestion => StatusCode::BAD_REQUEST,
        PipelineError::SearchUnavailable(_) | PipelineError::AnswerGeneration(_) => {
            StatusCode::BAD_GATEWAY
        }
        PipelineError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        log::warn!("rejected ask body: {rejection}");
        error_response(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(SessionStore::new_session_id);

    // Snapshot up front; only a successful run writes back.
    let history = state.sessions.snapshot(&session_id);

    let outcome = state
        .pipeline
        .answer(&request.question, &history)
        .await
        .map_err(|e| {
            log::warn!("ask failed for session {session_id}: {e}");
            error_response(status_for(&e), e.to_string())
        })?;

    state.sessions.store(&session_id, outcome.history);

    let processing_time_ms = start.elapsed().as_millis();
    Ok(Json(AskResponse::new(
        session_id,
        request.question,
        outcome.result,
        processing_time_ms,
    )))
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let exchanges = state.sessions.snapshot(&session_id);
    Json(HistoryResponse {
        session_id,
        exchanges,
    })
}

pub async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> StatusCode {
    if state.sessions.clear(&session_id) {
        log::info!("cleared history for session {session_id}");
    }
    StatusCode::NO_CONTENT
}

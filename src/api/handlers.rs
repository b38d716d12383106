//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, MAX_SESSION_ID_CHARS, MAX_TEXT_CHARS,
};
use super::AppState;
use crate::runtime::ResponseDirective;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat messages
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/start", post(start_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    check_session_id(&id)?;
    if req.text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::BadRequest(format!(
            "Message longer than {MAX_TEXT_CHARS} characters"
        )));
    }

    let directive = run_blocking(&state, move |runtime| runtime.handle(&id, &req.text)).await?;
    Ok(Json(ChatResponse::from_directive(
        directive,
        state.runtime.vocabulary(),
    )))
}

async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatResponse>, AppError> {
    check_session_id(&id)?;
    let directive = run_blocking(&state, move |runtime| runtime.start(&id)).await?;
    Ok(Json(ChatResponse::from_directive(
        directive,
        state.runtime.vocabulary(),
    )))
}

/// Sessions are kept in memory per id, so ids must stay small
fn check_session_id(id: &str) -> Result<(), AppError> {
    if id.is_empty() || id.chars().count() > MAX_SESSION_ID_CHARS {
        return Err(AppError::BadRequest(format!(
            "Session id must be 1 to {MAX_SESSION_ID_CHARS} characters"
        )));
    }
    Ok(())
}

/// Session locks and SQLite calls block, so keep them off the async workers
async fn run_blocking<F>(state: &AppState, f: F) -> Result<ResponseDirective, AppError>
where
    F: FnOnce(&crate::runtime::ProductionRuntime) -> ResponseDirective + Send + 'static,
{
    let runtime = state.runtime.clone();
    tokio::task::spawn_blocking(move || f(&runtime))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn get_version() -> &'static str {
    concat!("debt-ledger ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

//! Message HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/sessions/{id}/messages - Full history, oldest first
//! - POST /api/v1/sessions/{id}/messages - Send a message, get the exchange back
//! - POST /api/v1/sessions/{id}/retry    - Answer a trailing unanswered message

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use counsel_types::chat::{ChatMessage, Exchange};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /api/v1/sessions/{id}/messages - Get messages for a session.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;

    let messages = state.chat_service.get_messages(&sid).await?;

    let resp = ApiResponse::success(messages, &timer)
        .with_link("self", &format!("/api/v1/sessions/{sid}/messages"))
        .with_link("session", &format!("/api/v1/sessions/{sid}"));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/messages - Send a message and wait for the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Exchange>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;
    let Json(body) = payload?;

    let exchange = state.chat_service.send_message(sid, &body.content).await?;

    let resp = ApiResponse::success(exchange, &timer)
        .with_link("messages", &format!("/api/v1/sessions/{sid}/messages"));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/retry - Generate the reply a failed send never got.
pub async fn retry_last_exchange(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Exchange>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;

    let exchange = state.chat_service.retry_last_exchange(sid).await?;

    let resp = ApiResponse::success(exchange, &timer)
        .with_link("messages", &format!("/api/v1/sessions/{sid}/messages"));
    Ok(Json(resp))
}

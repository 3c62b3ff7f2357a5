//! Session CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions            - Create a session
//! - GET    /api/v1/sessions?user_id=   - List sessions, most recent first
//! - GET    /api/v1/sessions/{id}       - Get a single session
//! - PATCH  /api/v1/sessions/{id}       - Rename a session
//! - DELETE /api/v1/sessions/{id}       - Delete a session and its messages

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use counsel_types::chat::{ChatSession, NewSession, SessionFilter, SessionSummary};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for session creation. Missing fields become empty strings
/// so they are reported as validation errors.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub service_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub user_id: Option<String>,
}

fn session_links(resp: ApiResponse<ChatSession>) -> ApiResponse<ChatSession> {
    let id = resp.data.as_ref().map(|s| s.id.to_string()).unwrap_or_default();
    resp.with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("messages", &format!("/api/v1/sessions/{id}/messages"))
}

/// POST /api/v1/sessions - Create a session.
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ChatSession>>), AppError> {
    let timer = RequestTimer::start();
    let Json(body) = payload?;

    let session = state
        .chat_service
        .create_session(NewSession {
            title: body.title,
            description: body.description,
            user_id: body.user_id,
            service_type: body.service_type,
        })
        .await?;

    let resp = session_links(ApiResponse::success(session, &timer));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/sessions - List the caller's sessions.
///
/// Without `user_id`, only unowned sessions are returned.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, AppError> {
    let timer = RequestTimer::start();

    let filter = SessionFilter::for_caller(query.user_id.as_deref());
    let sessions = state.chat_service.list_sessions(&filter).await?;

    let resp = ApiResponse::success(sessions, &timer).with_link("self", "/api/v1/sessions");
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id} - Get a session by ID.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;

    let session = state.chat_service.get_session(&sid).await?;

    Ok(Json(session_links(ApiResponse::success(session, &timer))))
}

/// PATCH /api/v1/sessions/{id} - Rename a session.
pub async fn rename_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<RenameSessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;
    let Json(body) = payload?;

    let session = state.chat_service.rename_session(sid, &body.title).await?;

    Ok(Json(session_links(ApiResponse::success(session, &timer))))
}

/// DELETE /api/v1/sessions/{id} - Delete a session and all its messages.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let sid = parse_uuid(&session_id)?;

    state.chat_service.delete_session(sid).await?;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "session_id": sid.to_string()}),
        &timer,
    );
    Ok(Json(resp))
}

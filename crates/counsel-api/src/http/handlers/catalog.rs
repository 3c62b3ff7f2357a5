//! Read-only service catalog and quick action endpoints.

use axum::Json;

use counsel_core::chat::instructions::{self, ServiceProfile};
use counsel_core::chat::quick_actions::{QUICK_ACTIONS, QuickAction};

use crate::http::response::{ApiResponse, RequestTimer};

/// GET /api/v1/services - Every counseling service with its instruction
/// and follow-up questions.
pub async fn list_services() -> Json<ApiResponse<Vec<ServiceProfile>>> {
    let timer = RequestTimer::start();
    Json(ApiResponse::success(instructions::catalog(), &timer).with_link("self", "/api/v1/services"))
}

/// GET /api/v1/quick-actions - Canned starter prompts.
pub async fn list_quick_actions() -> Json<ApiResponse<&'static [QuickAction]>> {
    let timer = RequestTimer::start();
    Json(ApiResponse::success(QUICK_ACTIONS, &timer).with_link("self", "/api/v1/quick-actions"))
}

use crate::core::state::AppState;
use crate::models::session::SessionStatus;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub session: String,
    pub timestamp: i64,
}

/// Health check handler
///
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default();

    let session = match state.session.status() {
        SessionStatus::Uninitialized => "uninitialized",
        SessionStatus::Resolving => "resolving",
        SessionStatus::Authenticated => "authenticated",
        SessionStatus::Anonymous => "anonymous",
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            session: session.to_string(),
            timestamp,
        }),
    )
}

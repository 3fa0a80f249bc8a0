use crate::core::error::FrontendError;
use crate::core::state::AppState;
use crate::models::profile::{Profile, ProfileUpdate};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::sync::Arc;

/// Profile of the signed-in user
///
/// GET /account/profile
pub async fn profile_handler(State(state): State<Arc<AppState>>) -> Result<Json<Profile>, FrontendError> {
    Ok(Json(state.session.profile().await?))
}

/// Update the signed-in user's profile
///
/// PUT /account/profile
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Profile>, FrontendError> {
    let Json(update) = body.map_err(|e| FrontendError::InvalidBody(e.body_text()))?;
    Ok(Json(state.session.update_profile(&update).await?))
}

/// Role dashboard payload from the Account Service
///
/// GET /account/dashboard
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, FrontendError> {
    Ok(Json(state.session.dashboard().await?))
}

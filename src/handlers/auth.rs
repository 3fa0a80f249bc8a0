use crate::core::error::{session_status_code, FrontendError};
use crate::core::state::AppState;
use crate::models::auth::{Credentials, Registration};
use crate::models::responses::{AuthSuccess, LoginFailure, RegisterFailure, SuccessResponse};
use crate::models::session::SessionView;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::info;

/// Current session
///
/// GET /session
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.session.session().view())
}

/// Sign in
///
/// POST /session/login  {"username": .., "password": ..}
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let Json(credentials) = body.map_err(|e| FrontendError::InvalidBody(e.body_text()))?;

    let _guard = state.auth_lock.lock().await;
    let result = state
        .session
        .login(&credentials.username, &credentials.password)
        .await;

    Ok(match result {
        Ok(user) => (
            StatusCode::OK,
            Json(AuthSuccess {
                success: true,
                redirect: user.role.home_path(),
                user,
            }),
        )
            .into_response(),
        Err(err) => (
            session_status_code(&err),
            Json(LoginFailure {
                success: false,
                error: err.to_string(),
                username: credentials.username,
            }),
        )
            .into_response(),
    })
}

/// Create an account and sign in with it
///
/// POST /session/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Registration>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let Json(registration) = body.map_err(|e| FrontendError::InvalidBody(e.body_text()))?;

    let _guard = state.auth_lock.lock().await;
    let result = state.session.register(&registration).await;

    Ok(match result {
        Ok(user) => (
            StatusCode::CREATED,
            Json(AuthSuccess {
                success: true,
                redirect: user.role.home_path(),
                user,
            }),
        )
            .into_response(),
        Err(err) => (
            session_status_code(&err),
            Json(RegisterFailure {
                success: false,
                error: err.to_string(),
                username: registration.username,
                email: registration.email,
                full_name: registration.display_name,
                role: registration.role,
            }),
        )
            .into_response(),
    })
}

/// Sign out. Always succeeds.
///
/// POST /session/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    let _guard = state.auth_lock.lock().await;
    state.session.logout();
    info!("Logout requested through the front-end");

    Json(SuccessResponse {
        success: true,
        message: "Signed out".to_string(),
    })
}

// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))

        // Session lifecycle
        .route("/session", get(crate::handlers::auth::session_handler))
        .route("/session/login", post(crate::handlers::auth::login_handler))
        .route("/session/register", post(crate::handlers::auth::register_handler))
        .route("/session/logout", post(crate::handlers::auth::logout_handler))

        // Authenticated Account Service calls
        .route(
            "/account/profile",
            get(crate::handlers::account::profile_handler)
                .put(crate::handlers::account::update_profile_handler),
        )
        .route("/account/dashboard", get(crate::handlers::account::dashboard_handler))

        // Everything else is a navigation to a view
        .fallback(crate::handlers::navigation::navigation_handler)

        .with_state(state)
}

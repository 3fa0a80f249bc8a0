// Every GET that is not an API route is a navigation to a view

use crate::core::error::FrontendError;
use crate::core::state::AppState;
use crate::models::responses::{LoadingResponse, MenuEntry, ViewResponse};
use crate::routing::authorizer::{navigate, Navigation};
use crate::routing::views::View;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

pub async fn navigation_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return FrontendError::NotFound(format!("{} {}", method, uri.path())).into_response();
    }

    // read the live session on every navigation
    let session = state.session.session();
    let decision = navigate(&session, uri.path());
    debug!(path = %uri.path(), status = ?session.status(), decision = ?decision, "Navigation");

    match decision {
        Navigation::Loading => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store")],
            Json(LoadingResponse {
                status: "loading",
                message: "Loading...",
            }),
        )
            .into_response(),
        Navigation::Redirect(path) => Redirect::to(path).into_response(),
        Navigation::Render(view) => {
            let role = session.role();
            Json(ViewResponse {
                view,
                path: view.path(),
                title: view.title(),
                greeting: session.current_user().map(|user| user.greeting_name().to_string()),
                menu: role
                    .map(View::menu)
                    .unwrap_or_default()
                    .into_iter()
                    .map(MenuEntry::from)
                    .collect(),
            })
            .into_response()
        }
    }
}

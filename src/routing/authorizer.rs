// Role-based navigation decisions. Pure functions over the session state.

use crate::models::session::{Session, SessionStatus};
use crate::models::user::Role;
use crate::routing::views::{View, LOGIN_PATH};

/// Outcome of a single authorization check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Startup resolution is still running; show a placeholder, do not redirect
    Loading,
    Render,
    RedirectLogin,
    /// Send the user to the landing view of their own role
    RedirectHome(Role),
}

/// Decide whether a view with `required_role` may be shown
pub fn authorize(status: SessionStatus, role: Option<Role>, required_role: Option<Role>) -> Action {
    if status.is_pending() {
        return Action::Loading;
    }
    if status != SessionStatus::Authenticated {
        return Action::RedirectLogin;
    }

    match (required_role, role) {
        (Some(required), Some(actual)) if required != actual => Action::RedirectHome(actual),
        (Some(_), None) => Action::RedirectLogin,
        _ => Action::Render,
    }
}

/// Result of navigating to a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Loading,
    Render(View),
    Redirect(&'static str),
}

/// Resolve a navigation request against the live session.
///
/// Besides the protected views this covers the public routes: the login view
/// bounces signed-in users to their home, and `/` or any unknown path lands on
/// the home view or the login view.
pub fn navigate(session: &Session, path: &str) -> Navigation {
    let status = session.status();
    let role = session.role();

    match View::from_path(path) {
        Some(View::Login) => match (status.is_pending(), role) {
            (true, _) => Navigation::Loading,
            (false, Some(role)) if session.is_authenticated() => Navigation::Redirect(role.home_path()),
            _ => Navigation::Render(View::Login),
        },
        Some(view) => match authorize(status, role, view.required_role()) {
            Action::Loading => Navigation::Loading,
            Action::Render => Navigation::Render(view),
            Action::RedirectLogin => Navigation::Redirect(LOGIN_PATH),
            Action::RedirectHome(role) => Navigation::Redirect(role.home_path()),
        },
        None => home(status, role),
    }
}

fn home(status: SessionStatus, role: Option<Role>) -> Navigation {
    match (status, role) {
        (status, _) if status.is_pending() => Navigation::Loading,
        (SessionStatus::Authenticated, Some(role)) => Navigation::Redirect(role.home_path()),
        _ => Navigation::Redirect(LOGIN_PATH),
    }
}

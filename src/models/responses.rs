use crate::models::user::{Role, UserIdentity};
use crate::routing::views::View;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Reply to a successful sign-in or registration
#[derive(Serialize)]
pub struct AuthSuccess {
    pub success: bool,
    pub user: UserIdentity,
    /// Where the client should navigate next
    pub redirect: &'static str,
}

/// Failed sign-in. Echoes the entered username so the form keeps it.
#[derive(Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub error: String,
    pub username: String,
}

/// Failed registration. Echoes every non-secret field of the form.
#[derive(Serialize)]
pub struct RegisterFailure {
    pub success: bool,
    pub error: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub view: View,
    pub path: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    pub menu: Vec<MenuEntry>,
}

#[derive(Serialize)]
pub struct MenuEntry {
    pub view: View,
    pub path: &'static str,
    pub title: &'static str,
}

impl From<View> for MenuEntry {
    fn from(view: View) -> Self {
        Self {
            view,
            path: view.path(),
            title: view.title(),
        }
    }
}

#[derive(Serialize)]
pub struct LoadingResponse {
    pub status: &'static str,
    pub message: &'static str,
}

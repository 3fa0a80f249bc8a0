// Centralized error handling for the session front-end

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures reported by the Account Service client
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account Service rejected the credential")]
    Unauthorized { detail: Option<String> },

    #[error("Account Service returned status {status}")]
    Rejected { status: u16, detail: Option<String> },

    #[error("Failed to reach Account Service: {0}")]
    Transport(String),

    #[error("Unreadable response from Account Service: {0}")]
    InvalidResponse(String),
}

impl AccountError {
    /// Server-provided `detail`, when the service sent a plain message
    pub fn detail(&self) -> Option<&str> {
        match self {
            AccountError::Unauthorized { detail } | AccountError::Rejected { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }
}

/// Errors surfaced by session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to persist credential: {0}")]
    Storage(String),
}

impl SessionError {
    pub fn not_signed_in() -> Self {
        SessionError::Authentication("Not signed in".to_string())
    }

    /// Map a failure of an authenticated Account Service call
    pub fn from_account(err: AccountError) -> Self {
        match err {
            AccountError::Unauthorized { detail } => SessionError::Authentication(
                detail.unwrap_or_else(|| "Session expired, please sign in again".to_string()),
            ),
            AccountError::Rejected { status, detail } => SessionError::Rejected {
                status,
                message: detail.unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
            AccountError::Transport(msg) | AccountError::InvalidResponse(msg) => {
                SessionError::Network(msg)
            }
        }
    }
}

/// Errors returned by the front-end HTTP handlers
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl FrontendError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FrontendError::Session(err) => session_status_code(err),
            FrontendError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            FrontendError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// HTTP status a session failure is reported with
pub fn session_status_code(err: &SessionError) -> StatusCode {
    match err {
        SessionError::Validation(_) => StatusCode::BAD_REQUEST,
        SessionError::Authentication(_) => StatusCode::UNAUTHORIZED,
        // upstream server errors are not ours to report as 5xx
        SessionError::Rejected { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|code| code.is_client_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        SessionError::Network(_) => StatusCode::BAD_GATEWAY,
        SessionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> Response {
        use crate::models::responses::ErrorResponse;

        (
            self.status_code(),
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

use crate::models::user::{Role, UserIdentity};
use serde::Serialize;
use std::fmt;

/// Where the session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Process just started, startup resolution has not run yet
    Uninitialized,
    /// A persisted token is being checked against the Account Service
    Resolving,
    Authenticated,
    Anonymous,
}

impl SessionStatus {
    /// Startup resolution is still pending
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Uninitialized | SessionStatus::Resolving)
    }
}

/// Client-side record of the current authentication state.
///
/// Only constructible through the lifecycle constructors below, so a user is
/// present exactly when the status is `Authenticated`, and an authenticated
/// session always carries its credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    credential_token: Option<String>,
    current_user: Option<UserIdentity>,
}

impl Session {
    pub fn uninitialized() -> Self {
        Self {
            status: SessionStatus::Uninitialized,
            credential_token: None,
            current_user: None,
        }
    }

    pub fn resolving(token: String) -> Self {
        Self {
            status: SessionStatus::Resolving,
            credential_token: Some(token),
            current_user: None,
        }
    }

    pub fn authenticated(token: String, user: UserIdentity) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            credential_token: Some(token),
            current_user: Some(user),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            credential_token: None,
            current_user: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.current_user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user.as_ref().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub(crate) fn credential_token(&self) -> Option<&str> {
        self.credential_token.as_deref()
    }

    /// Serializable view without the credential
    pub fn view(&self) -> SessionView {
        SessionView {
            status: self.status,
            user: self.current_user.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("credential_token", &self.credential_token.as_ref().map(|_| "<redacted>"))
            .field("current_user", &self.current_user)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub user: Option<UserIdentity>,
}

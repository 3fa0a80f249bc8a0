use crate::models::user::Role;
use serde::Deserialize;
use std::fmt;

/// Sign-in form
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Account creation form
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    #[serde(rename = "password")]
    pub secret: String,
    #[serde(rename = "password_confirmation")]
    pub secret_confirmation: String,
    pub role: Role,
    #[serde(default, rename = "full_name")]
    pub display_name: Option<String>,
}

impl Registration {
    pub fn secrets_match(&self) -> bool {
        self.secret == self.secret_confirmation
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

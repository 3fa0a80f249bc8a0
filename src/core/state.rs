// Application state (AppState)

use crate::core::config::Config;
use crate::session::manager::SessionManager;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
///
/// Handed to every request handler; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// The one session of this client
    pub session: Arc<SessionManager>,

    /// Serializes startup resolution and sign-in/sign-out submissions, which
    /// the session manager does not coordinate itself
    pub auth_lock: Arc<Mutex<()>>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, session: SessionManager) -> Self {
        Self {
            session: Arc::new(session),
            auth_lock: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        }
    }
}

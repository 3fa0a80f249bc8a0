use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::client::AccountClient;
use crate::core::config::Config;
use crate::core::state::AppState;
use crate::session::manager::SessionManager;
use crate::stores::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Build the session manager described by the configuration
pub fn build_session(config: &Config) -> Result<SessionManager> {
    let client = AccountClient::new(
        &config.account_service.base_url,
        Duration::from_secs(config.account_service.timeout_secs),
    )
    .context("Failed to create Account Service client")?;

    let store: Arc<dyn TokenStore> = if config.session.persist {
        let store = FileTokenStore::new(&config.session.storage_dir)
            .context("Failed to open session storage")?;
        info!(storage_dir = %store.dir().display(), "Session storage opened");
        Arc::new(store)
    } else {
        info!("Session persistence disabled, keeping the token in memory");
        Arc::new(MemoryTokenStore::new())
    };

    Ok(SessionManager::new(client, store)
        .preserve_token_on_network_error(config.session.preserve_token_on_network_error))
}

/// Resolve the persisted session in the background.
///
/// Navigation requests arriving meanwhile see the `Resolving` status and get
/// the loading placeholder.
pub fn spawn_session_resolution(state: &AppState) -> tokio::task::JoinHandle<()> {
    let session = Arc::clone(&state.session);
    let auth_lock = Arc::clone(&state.auth_lock);

    tokio::spawn(async move {
        let _guard = auth_lock.lock().await;
        let status = session.initialize().await;
        info!(status = ?status, "Startup session resolution finished");
    })
}

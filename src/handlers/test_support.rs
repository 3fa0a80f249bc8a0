// Shared fixtures for handler tests

use crate::api::mock::MockAccountService;
use crate::core::config::Config;
use crate::core::state::AppState;
use crate::session::manager::SessionManager;
use crate::stores::token_store::MemoryTokenStore;
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;
use std::sync::Arc;

pub fn create_test_config(base_url: &str) -> Config {
    Config::from_toml(&format!(
        "[account_service]\nbase_url = \"{}\"\n[session]\npersist = false\n",
        base_url
    ))
    .unwrap()
}

/// State backed by a running mock Account Service, startup resolution done
pub async fn create_test_state(mock: &MockAccountService) -> Arc<AppState> {
    let session = SessionManager::new(mock.client(), Arc::new(MemoryTokenStore::new()));
    session.initialize().await;
    Arc::new(AppState::new(create_test_config(mock.base_url()), session))
}

/// State whose startup resolution has not run yet
pub fn create_unresolved_state(mock: &MockAccountService) -> Arc<AppState> {
    let session = SessionManager::new(mock.client(), Arc::new(MemoryTokenStore::with_token("tok")));
    Arc::new(AppState::new(create_test_config(mock.base_url()), session))
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let (_, body) = response.into_parts();
    let bytes = Body::new(body).collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// Session lifecycle: startup resolution, login, registration, logout

use crate::api::client::{AccountClient, AccountService, LoginRequest, RegisterRequest};
use crate::core::error::{AccountError, SessionError};
use crate::models::auth::Registration;
use crate::models::profile::{Profile, ProfileUpdate};
use crate::models::session::{Session, SessionStatus};
use crate::models::user::{Role, UserIdentity};
use crate::stores::token_store::TokenStore;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const GENERIC_LOGIN_FAILURE: &str = "Login failed";

/// Single source of truth for who is signed in.
///
/// State is published through a watch channel; every reader either takes a
/// snapshot with [`SessionManager::session`] or follows updates through
/// [`SessionManager::subscribe`]. Overlapping `login`/`register` calls are not
/// coordinated here, callers serialize them.
pub struct SessionManager<S = AccountClient> {
    service: S,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    initialized: AtomicBool,
    preserve_token_on_network_error: bool,
}

impl<S: AccountService> SessionManager<S> {
    pub fn new(service: S, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::uninitialized());
        Self {
            service,
            store,
            state,
            initialized: AtomicBool::new(false),
            preserve_token_on_network_error: false,
        }
    }

    /// Keep the persisted token when startup resolution fails on transport
    /// errors, so the next start can retry it. A rejected token is always
    /// discarded.
    pub fn preserve_token_on_network_error(mut self, preserve: bool) -> Self {
        self.preserve_token_on_network_error = preserve;
        self
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Last user record cached by a successful sign-in, for display only
    pub fn cached_user(&self) -> Option<UserIdentity> {
        self.store.load_cached_user().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read cached user record");
            None
        })
    }

    fn publish(&self, session: Session) {
        debug!(status = ?session.status(), "Session updated");
        self.state.send_replace(session);
    }

    fn cache_user(&self, user: &UserIdentity) {
        if let Err(e) = self.store.store_cached_user(user) {
            warn!(error = %e, "Failed to cache user record");
        }
    }

    /// Resolve a persisted token into a session.
    ///
    /// Runs once per manager; later calls return the current status. Always
    /// ends in `Authenticated` or `Anonymous`.
    pub async fn initialize(&self) -> SessionStatus {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.status();
        }

        let token = self.store.load_token().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read persisted token, starting anonymous");
            None
        });

        let Some(token) = token else {
            info!("No persisted session, starting anonymous");
            self.publish(Session::anonymous());
            return SessionStatus::Anonymous;
        };

        self.publish(Session::resolving(token.clone()));

        match self.service.current_user(&token).await {
            Ok(record) => {
                let user = UserIdentity::from(record);
                info!(user_id = user.id, username = %user.username, role = %user.role, "Session restored");
                self.cache_user(&user);
                self.publish(Session::authenticated(token, user));
                SessionStatus::Authenticated
            }
            Err(err) => {
                let transient = matches!(err, AccountError::Transport(_));
                if transient && self.preserve_token_on_network_error {
                    warn!(error = %err, "Account Service unreachable, keeping persisted token for the next start");
                } else {
                    info!(error = %err, "Persisted session could not be restored, discarding token");
                    if let Err(e) = self.store.clear() {
                        warn!(error = %e, "Failed to clear persisted token");
                    }
                }
                self.publish(Session::anonymous());
                SessionStatus::Anonymous
            }
        }
    }

    /// Authenticate and populate the current user.
    ///
    /// On failure the previous session, persisted token included, is left as
    /// it was.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<UserIdentity, SessionError> {
        let request = LoginRequest {
            username: identifier.to_string(),
            password: secret.to_string(),
        };

        let response = self.service.login(&request).await.map_err(|err| {
            warn!(username = %identifier, error = %err, "Login rejected");
            login_error(err)
        })?;
        let token = response.access_token;

        // `None` when the slot could not be read; the rollback is skipped then
        let previous_token = match self.store.load_token() {
            Ok(previous) => Some(previous),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, it will not be restored if login fails");
                None
            }
        };
        self.store
            .store_token(&token)
            .map_err(|e| SessionError::Storage(format!("{:#}", e)))?;

        match self.service.current_user(&token).await {
            Ok(record) => {
                let user = UserIdentity::from(record);
                info!(user_id = user.id, username = %user.username, role = %user.role, "Signed in");
                self.cache_user(&user);
                self.publish(Session::authenticated(token, user.clone()));
                Ok(user)
            }
            Err(err) => {
                warn!(username = %identifier, error = %err, "Failed to resolve user after login");
                let restored = match previous_token {
                    Some(Some(previous)) => self.store.store_token(&previous),
                    Some(None) => self.store.clear(),
                    None => Ok(()),
                };
                if let Err(e) = restored {
                    warn!(error = %e, "Failed to restore previous token");
                }
                Err(login_error(err))
            }
        }
    }

    /// Create an account, then sign in with it
    pub async fn register(&self, registration: &Registration) -> Result<UserIdentity, SessionError> {
        if !registration.secrets_match() {
            return Err(SessionError::Validation("passwords do not match".to_string()));
        }

        let request = RegisterRequest {
            username: registration.username.clone(),
            email: registration.email.clone(),
            password: registration.secret.clone(),
            role: registration.role,
            full_name: registration.display_name.clone().filter(|name| !name.is_empty()),
        };

        let record = self.service.register(&request).await.map_err(|err| {
            warn!(username = %registration.username, error = %err, "Registration rejected");
            SessionError::from_account(err)
        })?;
        info!(user_id = record.id, username = %record.username, role = %record.role, "Account created");

        self.login(&registration.username, &registration.secret).await
    }

    /// Drop the session and its persisted credential
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted token");
        }
        if let Some(user) = self.state.borrow().current_user() {
            info!(user_id = user.id, username = %user.username, "Signed out");
        }
        self.publish(Session::anonymous());
    }

    /// Drop the session only if it still runs on `token`.
    ///
    /// A login may have persisted a newer token without publishing it yet, so
    /// the store is cleared only while it still holds `token` too.
    fn logout_if_current(&self, token: &str) {
        let signed_out = self.state.send_if_modified(|session| {
            if session.credential_token() != Some(token) {
                return false;
            }
            *session = Session::anonymous();
            true
        });
        if !signed_out {
            return;
        }

        warn!("Account Service rejected the session token, signing out");
        match self.store.clear_if(token) {
            Ok(true) => {}
            Ok(false) => debug!("Persisted token was replaced, keeping it"),
            Err(e) => warn!(error = %e, "Failed to clear persisted token"),
        }
    }

    /// Run an authenticated Account Service call with the current token.
    ///
    /// A 401 tears the session down, unless a different session has been
    /// established while the call was in flight.
    async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: FnOnce(String, Role) -> Fut,
        Fut: Future<Output = Result<T, AccountError>>,
    {
        let session = self.session();
        let (Some(token), Some(role)) = (session.credential_token(), session.role()) else {
            return Err(SessionError::not_signed_in());
        };
        let token = token.to_string();

        match call(token.clone(), role).await {
            Ok(value) => Ok(value),
            Err(err @ AccountError::Unauthorized { .. }) => {
                self.logout_if_current(&token);
                Err(SessionError::from_account(err))
            }
            Err(err) => Err(SessionError::from_account(err)),
        }
    }

    pub async fn profile(&self) -> Result<Profile, SessionError> {
        let (role, value) = self
            .authorized(|token, role| async move {
                self.service.profile(&token).await.map(|value| (role, value))
            })
            .await?;

        Profile::from_value(role, value)
            .map_err(|e| SessionError::Network(format!("Unreadable profile record: {}", e)))
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, SessionError> {
        if update.is_empty() {
            return Err(SessionError::Validation("no profile fields to update".to_string()));
        }
        if let Some(role) = self.session().role() {
            let disallowed = update.disallowed_fields(role);
            if !disallowed.is_empty() {
                return Err(SessionError::Validation(format!(
                    "fields not editable for {} accounts: {}",
                    role,
                    disallowed.join(", ")
                )));
            }
        }

        let (role, value) = self
            .authorized(|token, role| async move {
                self.service
                    .update_profile(&token, update)
                    .await
                    .map(|value| (role, value))
            })
            .await?;

        let record = value.get("profile").cloned().unwrap_or(value);
        Profile::from_value(role, record)
            .map_err(|e| SessionError::Network(format!("Unreadable profile record: {}", e)))
    }

    /// Role-specific dashboard payload
    pub async fn dashboard(&self) -> Result<serde_json::Value, SessionError> {
        self.authorized(|token, role| async move { self.service.dashboard(&token, role).await })
            .await
    }
}

fn login_error(err: AccountError) -> SessionError {
    match err {
        AccountError::Transport(msg) | AccountError::InvalidResponse(msg) => SessionError::Network(msg),
        other => SessionError::Authentication(
            other
                .detail()
                .unwrap_or(GENERIC_LOGIN_FAILURE)
                .to_string(),
        ),
    }
}

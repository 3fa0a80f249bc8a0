use crate::core::error::AccountError;
use crate::models::profile::ProfileUpdate;
use crate::models::user::{Role, UserIdentity};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Operations the session layer needs from the Account Service
pub trait AccountService: Send + Sync {
    /// POST /users/register
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<UserRecord, AccountError>> + Send;

    /// POST /users/login
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<TokenResponse, AccountError>> + Send;

    /// GET /users/me
    fn current_user(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<UserRecord, AccountError>> + Send;

    /// GET /users/profile
    fn profile(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<serde_json::Value, AccountError>> + Send;

    /// PUT /users/profile
    fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<serde_json::Value, AccountError>> + Send;

    /// GET /students/dashboard or /faculty/dashboard
    fn dashboard(
        &self,
        token: &str,
        role: Role,
    ) -> impl Future<Output = Result<serde_json::Value, AccountError>> + Send;
}

#[derive(Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// User record as returned by /users/register and /users/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<UserRecord> for UserIdentity {
    fn from(record: UserRecord) -> Self {
        UserIdentity {
            id: record.id,
            username: record.username,
            email: record.email,
            display_name: record.full_name.filter(|name| !name.is_empty()),
            role: record.role,
            is_active: record.is_active,
        }
    }
}

/// Error body of the Account Service. `detail` is a string for most
/// failures but a list of field errors for request validation failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// HTTP client for the external Account Service
pub struct AccountClient {
    client: reqwest::Client,
    base_url: String,
}

impl AccountClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, AccountError> {
        let response = request
            .send()
            .await
            .map_err(|e| AccountError::Transport(e.to_string()))?;

        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AccountError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| AccountError::InvalidResponse(e.to_string()));
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(message) => Some(message),
            _ => None,
        });

    if status == StatusCode::UNAUTHORIZED {
        Err(AccountError::Unauthorized { detail })
    } else {
        Err(AccountError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

impl AccountService for AccountClient {
    async fn register(&self, request: &RegisterRequest) -> Result<UserRecord, AccountError> {
        self.send(self.client.post(self.url("/users/register")).json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AccountError> {
        self.send(self.client.post(self.url("/users/login")).json(request))
            .await
    }

    async fn current_user(&self, token: &str) -> Result<UserRecord, AccountError> {
        self.send(self.client.get(self.url("/users/me")).bearer_auth(token))
            .await
    }

    async fn profile(&self, token: &str) -> Result<serde_json::Value, AccountError> {
        self.send(self.client.get(self.url("/users/profile")).bearer_auth(token))
            .await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<serde_json::Value, AccountError> {
        self.send(
            self.client
                .put(self.url("/users/profile"))
                .bearer_auth(token)
                .json(update),
        )
        .await
    }

    async fn dashboard(&self, token: &str, role: Role) -> Result<serde_json::Value, AccountError> {
        let path = match role {
            Role::Student => "/students/dashboard",
            Role::Faculty => "/faculty/dashboard",
        };
        self.send(self.client.get(self.url(path)).bearer_auth(token))
            .await
    }
}

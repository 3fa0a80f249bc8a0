// In-process Account Service used by the tests

use crate::api::client::AccountClient;
use crate::models::user::Role;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

struct Account {
    password: String,
    record: Value,
    profile: Value,
}

#[derive(Default)]
struct MockState {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, String>>,
    requests: AtomicUsize,
    next_id: AtomicUsize,
    reject_current_user: AtomicBool,
}

impl MockState {
    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.lock().unwrap().get(token).cloned()
    }
}

pub struct MockAccountService {
    state: Arc<MockState>,
    base_url: String,
}

impl MockAccountService {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/users/register", post(register))
            .route("/users/login", post(login))
            .route("/users/me", get(me))
            .route("/users/profile", get(profile).put(update_profile))
            .route("/students/dashboard", get(student_dashboard))
            .route("/faculty/dashboard", get(faculty_dashboard))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> AccountClient {
        AccountClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn add_user(&self, username: &str, password: &str, role: Role) {
        create_account(&self.state, username, &format!("{username}@uni.edu"), password, role, None);
    }

    /// Number of requests served so far
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Invalidate every issued token, as if they all expired
    pub fn revoke_tokens(&self) {
        self.state.tokens.lock().unwrap().clear();
    }

    /// Answer /users/me with 401 even for freshly issued tokens
    pub fn reject_current_user(&self, reject: bool) {
        self.state.reject_current_user.store(reject, Ordering::SeqCst);
    }
}

/// Base URL that refuses connections
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn create_account(
    state: &MockState,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
    full_name: Option<&str>,
) -> Value {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let record = json!({
        "id": id,
        "username": username,
        "email": email,
        "full_name": full_name,
        "role": role.as_str(),
        "is_active": true,
        "created_at": "2024-09-01T10:00:00",
    });
    let profile = json!({"id": id, "user_id": id});

    state.accounts.lock().unwrap().insert(
        username.to_string(),
        Account {
            password: password.to_string(),
            record: record.clone(),
            profile,
        },
    );
    record
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let username = body["username"].as_str().unwrap_or_default();
    let email = body["email"].as_str().unwrap_or_default();
    if !email.contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]})),
        )
            .into_response();
    }
    if state.accounts.lock().unwrap().contains_key(username) {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }
    let role = match body["role"].as_str() {
        Some("student") => Role::Student,
        Some("faculty") => Role::Faculty,
        _ => return detail(StatusCode::BAD_REQUEST, "Role must be either 'student' or 'faculty'"),
    };

    let record = create_account(
        &state,
        username,
        email,
        body["password"].as_str().unwrap_or_default(),
        role,
        body["full_name"].as_str(),
    );
    (StatusCode::OK, Json(record)).into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let valid = state
        .accounts
        .lock()
        .unwrap()
        .get(username)
        .map(|account| account.password == password)
        .unwrap_or(false);
    if !valid {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }

    let token = format!("token-{}-{}", username, state.requests.load(Ordering::SeqCst));
    state
        .tokens
        .lock()
        .unwrap()
        .insert(token.clone(), username.to_string());
    Json(json!({"access_token": token, "token_type": "bearer"})).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if state.reject_current_user.load(Ordering::SeqCst) {
        return unauthorized();
    }

    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    let record = state.accounts.lock().unwrap()[&username].record.clone();
    Json(record).into_response()
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    let profile = state.accounts.lock().unwrap()[&username].profile.clone();
    Json(profile).into_response()
}

async fn update_profile(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    let mut accounts = state.accounts.lock().unwrap();
    let account = accounts.get_mut(&username).unwrap();
    if let (Some(profile), Some(changes)) = (account.profile.as_object_mut(), body.as_object()) {
        for (field, value) in changes {
            profile.insert(field.clone(), value.clone());
        }
    }
    Json(json!({"message": "Profile updated successfully", "profile": account.profile})).into_response()
}

async fn dashboard_for(state: &MockState, headers: &HeaderMap, role: Role) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let Some(username) = state.user_for(headers) else {
        return unauthorized();
    };
    let record = state.accounts.lock().unwrap()[&username].record.clone();
    if record["role"] != role.as_str() {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    Json(json!({
        "message": format!("Welcome to {} dashboard, {}!", role, username),
        "user": record,
    }))
    .into_response()
}

async fn student_dashboard(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    dashboard_for(&state, &headers, Role::Student).await
}

async fn faculty_dashboard(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    dashboard_for(&state, &headers, Role::Faculty).await
}

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use sasb_auth::TokenPair;
use sasb_client::{ApiClient, AuthState, ClientConfig, ClientError, FileTokenStore, TokenStore};
use sasb_core::Role;

#[derive(Default)]
struct MockState {
    valid_access: String,
    valid_refresh: String,
    refresh_calls: usize,
    seen_auth: Vec<Option<String>>,
}

type Shared = Arc<Mutex<MockState>>;

struct MockApi {
    base_url: String,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApi {
    async fn spawn(valid_access: &str, valid_refresh: &str) -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            valid_access: valid_access.into(),
            valid_refresh: valid_refresh.into(),
            ..MockState::default()
        }));

        let api = Router::new()
            .route("/token/", post(token))
            .route("/token/refresh/", post(refresh))
            .route("/me/", get(me))
            .route("/services/", get(services))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        }
    }

    fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refresh_calls
    }

    fn seen_auth(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().seen_auth.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

/// Record the bearer header and check it against the currently valid token.
fn authenticated(state: &Shared, headers: &HeaderMap) -> bool {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut state = state.lock().unwrap();
    let ok = auth.as_deref() == Some(format!("Bearer {}", state.valid_access).as_str());
    state.seen_auth.push(auth);
    ok
}

async fn token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["username"] == "maria" && body["password"] == "secret1" {
        let state = state.lock().unwrap();
        Json(json!({"access": state.valid_access, "refresh": state.valid_refresh})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.refresh_calls += 1;
    if body["refresh"] == state.valid_refresh.as_str() {
        state.valid_access = "new123".into();
        Json(json!({"access": "new123"})).into_response()
    } else {
        unauthorized()
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authenticated(&state, &headers) {
        return unauthorized();
    }
    Json(json!({
        "id": 1,
        "username": "maria",
        "first_name": "Maria",
        "last_name": "Silva",
        "email": "maria@example.com",
        "phone": "",
        "role": "ADMIN",
        "is_active": true
    }))
    .into_response()
}

async fn services(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authenticated(&state, &headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 1, "name": "Corte", "duration": 30, "price": "50.00", "is_active": true, "can_delete": false}
    ]))
    .into_response()
}

fn client_for(base_url: &str, dir: &tempfile::TempDir) -> (ApiClient, FileTokenStore) {
    let config = ClientConfig::new(base_url, dir.path().join("tokens.json"));
    let client = ApiClient::from_config(&config).unwrap();
    (client, FileTokenStore::new(&config.token_path))
}

#[tokio::test]
async fn login_persists_tokens_for_the_next_process() {
    let api = MockApi::spawn("abc", "xyz").await;
    let dir = tempfile::tempdir().unwrap();

    let (client, store) = client_for(&api.base_url, &dir);
    let user = client.login("maria", "secret1").await.unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(store.token_pair(), Some(TokenPair::new("abc", "xyz")));

    // A fresh client over the same token file restores the session.
    let (restarted, _) = client_for(&api.base_url, &dir);
    let state = restarted.initialize().await;
    assert_eq!(state.user().map(|u| u.username.as_str()), Some("maria"));

    let services = restarted.list_services(None).await.unwrap();
    assert_eq!(services[0].price.cents(), 5000);
    assert!(!services[0].can_delete);
    assert!(api.seen_auth().iter().all(|a| a.as_deref() == Some("Bearer abc")));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let api = MockApi::spawn("abc", "xyz").await;
    let dir = tempfile::tempdir().unwrap();
    let (client, store) = client_for(&api.base_url, &dir);

    let err = client.login("maria", "nope").await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidCredentials));
    assert_eq!(store.token_pair(), None);
}

#[tokio::test]
async fn expired_access_token_is_refreshed_once() {
    let api = MockApi::spawn("abc", "xyz").await;
    let dir = tempfile::tempdir().unwrap();
    let (client, store) = client_for(&api.base_url, &dir);
    store.store_pair(&TokenPair::new("abc", "xyz")).unwrap();

    // The server rotates its valid access token; ours is now stale.
    api.state.lock().unwrap().valid_access = "rotated-away".into();

    let state = client.initialize().await;

    assert!(matches!(state, AuthState::Authenticated(_)));
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(
        api.seen_auth(),
        vec![Some("Bearer abc".to_string()), Some("Bearer new123".to_string())]
    );
    assert_eq!(store.token_pair(), Some(TokenPair::new("new123", "xyz")));
}

#[tokio::test]
async fn revoked_refresh_token_clears_the_stored_session() {
    let api = MockApi::spawn("abc", "xyz").await;
    let dir = tempfile::tempdir().unwrap();
    let (client, store) = client_for(&api.base_url, &dir);
    store.store_pair(&TokenPair::new("stale", "revoked")).unwrap();

    let state = client.initialize().await;

    assert_eq!(state, AuthState::Anonymous);
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(store.token_pair(), None);
    assert!(client.session().view().user.is_none());
}

#[tokio::test]
async fn closed_port_is_reported_as_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let (client, _) = client_for(&format!("http://{addr}/api"), &dir);

    let err = client.login("maria", "secret1").await.unwrap_err();

    assert!(matches!(err, ClientError::Unreachable(_)));
}

//! End-to-end tests against an in-process fake admin backend
//!
//! Run with: cargo test --test backend_tests
//! Covers:
//! - Login and session persistence
//! - Settings round trips with client-side validation
//! - Refresh-and-retry when the backend rejects a token

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use presale_admin::api::{ApiClient, DEFAULT_PAGE_SIZE};
use presale_admin::auth::{
    CredentialProvider, Credentials, NoCredentials, SessionManager, StaticCredentials,
};
use presale_admin::config::ApiConfig;
use presale_admin::error::Error;
use presale_admin::presale::{PresaleSettings, Tokenomics};
use presale_admin::retry::with_session;
use presale_admin::storage::{FileStore, SessionStore, TOKEN_KEY, USER_KEY};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const EMAIL: &str = "admin@memechain.com";
const PASSWORD: &str = "Admin@123456";

// ============================================================================
// Fake backend
// ============================================================================

struct Backend {
    valid_token: Mutex<Option<String>>,
    tokenomics: Mutex<Value>,
    refreshes: AtomicUsize,
    writes: AtomicUsize,
    presale_updates: Mutex<Vec<(&'static str, Value)>>,
}

impl Backend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            valid_token: Mutex::new(None),
            tokenomics: Mutex::new(serde_json::to_value(Tokenomics::default()).unwrap()),
            refreshes: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            presale_updates: Mutex::new(Vec::new()),
        })
    }

    /// Invalidate whatever token was issued last
    fn expire_tokens(&self) {
        *self.valid_token.lock().unwrap() = Some("rotated-server-side".to_string());
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = self.valid_token.lock().unwrap().clone();
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        matches!((expected, presented), (Some(e), Some(p)) if e == p)
    }
}

fn admin_json() -> Value {
    json!({
        "id": 1,
        "name": "Super Admin",
        "email": EMAIL,
        "role": "super_admin",
        "permissions": ["all"],
        "isActive": true
    })
}

fn issue(backend: &Backend, body: &Value, token: &str) -> (StatusCode, Json<Value>) {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        *backend.valid_token.lock().unwrap() = Some(token.to_string());
        (
            StatusCode::OK,
            Json(json!({ "success": true, "token": token, "admin": admin_json() })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid credentials" })),
        )
    }
}

fn expired() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Token expired" })),
    )
}

async fn login(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    issue(&backend, &body, "abc")
}

async fn refresh_token(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.refreshes.fetch_add(1, Ordering::SeqCst);
    issue(&backend, &body, "refreshed")
}

async fn get_tokenomics(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return expired();
    }
    let mut stored = backend.tokenomics.lock().unwrap().clone();
    stored["updated_at"] = json!("2025-01-15T10:30:00.000Z");
    (StatusCode::OK, Json(stored))
}

async fn set_tokenomics(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return expired();
    }
    backend.writes.fetch_add(1, Ordering::SeqCst);
    *backend.tokenomics.lock().unwrap() = body;
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Tokenomics updated successfully" })),
    )
}

async fn participants(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return expired();
    }
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    (
        StatusCode::OK,
        Json(json!({
            "participants": [
                { "id": 11, "walletid": "0xabc", "paid": 1, "col2": "2025-01-10T08:00:00Z", "col3": "1500" },
                { "id": 12, "walletid": "0xdef", "paid": false }
            ],
            "pagination": { "page": page, "pages": 3 }
        })),
    )
}

fn record_presale_update(
    backend: &Backend,
    headers: &HeaderMap,
    kind: &'static str,
    body: Value,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(headers) {
        return expired();
    }
    backend.presale_updates.lock().unwrap().push((kind, body));
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn update_price(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_presale_update(&backend, &headers, "price", body)
}

async fn update_settings(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_presale_update(&backend, &headers, "settings", body)
}

async fn export_subscribers(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return expired();
    }
    (
        StatusCode::OK,
        Json(json!({
            "subscribers": [
                { "email": "first@example.com", "subscribed_at": "2025-01-02T09:00:00Z" },
                { "email": "second@example.com", "subscribed_at": "2025-01-05T17:45:00Z" }
            ]
        })),
    )
}

async fn spawn_backend(backend: Arc<Backend>) -> ApiClient {
    let app = Router::new()
        .route("/api/v1/admin/login", post(login))
        .route("/api/v1/admin/refresh-token", post(refresh_token))
        .route("/api/v1/admin/tokenomics", get(get_tokenomics).post(set_tokenomics))
        .route("/api/v1/admin/participants", get(participants))
        .route("/api/v1/admin/presale/update-price", post(update_price))
        .route("/api/v1/admin/presale/update-settings", post(update_settings))
        .route("/api/v1/admin/newsletter/export", get(export_subscribers))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&ApiConfig {
        base_url: format!("http://{}/api/v1", addr),
        timeout_secs: 5,
    })
    .unwrap()
}

fn manager(
    dir: &TempDir,
    api: &ApiClient,
    credentials: Arc<dyn CredentialProvider>,
) -> (SessionManager, Arc<FileStore>) {
    let store = Arc::new(FileStore::new(dir.path().join("session.json")));
    let session = SessionManager::load(store.clone(), Arc::new(api.clone()), credentials);
    (session, store)
}

fn static_credentials() -> Arc<dyn CredentialProvider> {
    Arc::new(StaticCredentials::new(Credentials::new(EMAIL, PASSWORD)))
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_persists_session() {
    let dir = TempDir::new().unwrap();
    let api = spawn_backend(Backend::new()).await;
    let (session, store) = manager(&dir, &api, Arc::new(NoCredentials));

    let user = session.authenticate(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(user.name, "Super Admin");
    assert!(session.is_authenticated().await);
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert!(store.get(USER_KEY).unwrap().unwrap().contains(EMAIL));

    // A new process picks the session up from disk
    let (restored, _) = manager(&dir, &api, Arc::new(NoCredentials));
    assert_eq!(restored.token().await.as_deref(), Some("abc"));
    assert_eq!(restored.user().await.unwrap().email, EMAIL);
    println!("✓ Login persisted to {}", store.path().display());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let dir = TempDir::new().unwrap();
    let api = spawn_backend(Backend::new()).await;
    let (session, store) = manager(&dir, &api, Arc::new(NoCredentials));

    let result = session.authenticate(EMAIL, "wrong").await;

    match result {
        Err(Error::LoginRejected(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected LoginRejected, got {:?}", other.map(|u| u.email)),
    }
    assert!(!session.is_authenticated().await);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_logout_removes_session_file() {
    let dir = TempDir::new().unwrap();
    let api = spawn_backend(Backend::new()).await;
    let (session, store) = manager(&dir, &api, Arc::new(NoCredentials));

    session.authenticate(EMAIL, PASSWORD).await.unwrap();
    session.logout().await.unwrap();
    session.logout().await.unwrap();

    assert!(!session.is_authenticated().await);
    assert!(store.get(TOKEN_KEY).unwrap().is_none());
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_tokenomics_round_trip() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    let mut tokenomics = Tokenomics {
        total_supply: 2_000_000_000,
        ..Default::default()
    };
    tokenomics.set_stage_price(2, 0.0025).unwrap();

    let update = &tokenomics;
    let ack = with_session(&session, |t| {
        let api = &api;
        async move { api.update_tokenomics(&t, update).await }
    })
    .await
    .unwrap();
    assert_eq!(ack.success, Some(true));

    let saved = with_session(&session, |t| {
        let api = &api;
        async move { api.tokenomics(&t).await }
    })
    .await
    .unwrap();

    assert_eq!(saved.total_supply, 2_000_000_000);
    assert_eq!(saved.stage_prices()[1], 0.0025);
    assert!(saved.updated_at.is_some());

    let distribution = saved.distribution();
    assert_eq!(distribution.team, 300_000_000);
    assert_eq!(distribution.presale, 600_000_000);
    assert_eq!(distribution.total(), 2_000_000_000);
    assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_tokenomics_never_reaches_backend() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    let invalid = Tokenomics {
        total_supply: 0,
        ..Default::default()
    };
    let update = &invalid;
    let result = with_session(&session, |t| {
        let api = &api;
        async move { api.update_tokenomics(&t, update).await }
    })
    .await;

    match result {
        Err(Error::Validation(message)) => {
            assert_eq!(message, "Total supply must be greater than 0")
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_participant_rows_are_numbered_across_pages() {
    let dir = TempDir::new().unwrap();
    let api = spawn_backend(Backend::new()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    let page = with_session(&session, |t| {
        let api = &api;
        async move { api.participants(&t, 2, DEFAULT_PAGE_SIZE).await }
    })
    .await
    .unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.pages, 3);
    assert!(page.has_previous() && page.has_next());
    assert_eq!(page.row_number(0), DEFAULT_PAGE_SIZE as u64 + 1);
    assert!(page.items[0].paid);
    assert_eq!(page.items[0].token_total(), 1500.0);
    assert!(!page.items[1].paid);
}

#[tokio::test]
async fn test_stage_price_and_settings_updates() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    with_session(&session, |t| {
        let api = &api;
        async move { api.update_presale_price(&t, 3, 0.0035).await }
    })
    .await
    .unwrap();

    let settings = PresaleSettings {
        min_purchase: Some(50.0),
        max_purchase: Some(5_000.0),
        start_date: Some("2025-03-01".to_string()),
        ..Default::default()
    };
    let update = &settings;
    with_session(&session, |t| {
        let api = &api;
        async move { api.update_presale_settings(&t, update).await }
    })
    .await
    .unwrap();

    let updates = backend.presale_updates.lock().unwrap().clone();
    assert_eq!(
        updates,
        vec![
            ("price", json!({ "stage": 3, "price": 0.0035 })),
            (
                "settings",
                json!({
                    "minPurchase": 50.0,
                    "maxPurchase": 5000.0,
                    "startDate": "2025-03-01 00:00:00"
                })
            ),
        ]
    );
}

#[tokio::test]
async fn test_invalid_settings_are_not_sent() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    let settings = PresaleSettings {
        start_date: Some("2025-04-01".to_string()),
        end_date: Some("2025-03-01".to_string()),
        ..Default::default()
    };
    let update = &settings;
    let result = with_session(&session, |t| {
        let api = &api;
        async move { api.update_presale_settings(&t, update).await }
    })
    .await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(backend.presale_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_newsletter_export() {
    let dir = TempDir::new().unwrap();
    let api = spawn_backend(Backend::new()).await;
    let (session, _) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    let export = with_session(&session, |t| {
        let api = &api;
        async move { api.export_newsletter_subscribers(&t).await }
    })
    .await
    .unwrap();

    assert_eq!(export["subscribers"].as_array().map(Vec::len), Some(2));
    assert_eq!(export["subscribers"][0]["email"], "first@example.com");
}

// ============================================================================
// Refresh and retry
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_call_retried() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, store) = manager(&dir, &api, static_credentials());
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    backend.expire_tokens();

    let tokenomics = with_session(&session, |t| {
        let api = &api;
        async move { api.tokenomics(&t).await }
    })
    .await
    .unwrap();

    assert_eq!(tokenomics.total_supply, 1_000_000_000);
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(session.token().await.as_deref(), Some("refreshed"));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("refreshed"));
}

#[tokio::test]
async fn test_refresh_without_credentials_ends_session() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, store) = manager(&dir, &api, Arc::new(NoCredentials));
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    backend.expire_tokens();

    let result = with_session(&session, |t| {
        let api = &api;
        async move { api.tokenomics(&t).await }
    })
    .await;

    assert!(matches!(result, Err(Error::SessionExpired)));
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated().await);
    assert!(store.get(TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_with_wrong_credentials_ends_session() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let wrong: Arc<dyn CredentialProvider> =
        Arc::new(StaticCredentials::new(Credentials::new(EMAIL, "stale-password")));
    let (session, _) = manager(&dir, &api, wrong);
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    backend.expire_tokens();

    assert!(!session.refresh().await);
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_concurrent_401s_refresh_once() {
    let dir = TempDir::new().unwrap();
    let backend = Backend::new();
    let api = spawn_backend(backend.clone()).await;
    let (session, _) = manager(&dir, &api, static_credentials());
    session.authenticate(EMAIL, PASSWORD).await.unwrap();

    backend.expire_tokens();

    let fetch = |session: SessionManager, api: ApiClient| async move {
        with_session(&session, |t| {
            let api = &api;
            async move { api.tokenomics(&t).await }
        })
        .await
    };
    let (a, b) = tokio::join!(
        fetch(session.clone(), api.clone()),
        fetch(session.clone(), api.clone())
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(session.token().await.as_deref(), Some("refreshed"));
}

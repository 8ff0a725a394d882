//! HTTP client integration tests against an in-process mock backend.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use console_auth::{MemoryNavigator, RefreshOutcome, RoleLabel, SessionManager, SessionPhase};
use console_client::HttpAuthApi;
use console_core::config::{ApiConfig, SessionConfig};
use console_core::error::ErrorKind;
use console_core::traits::AuthApi;
use helpers::{ManualClock, NOW, mint};

const SESSION_COOKIE: &str = "session_token=abc123";

struct Backend {
    token: String,
    empty_refresh: bool,
    logouts: AtomicUsize,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

async fn login(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "The email or password is incorrect. Try again." })),
        )
            .into_response();
    }
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({ "result": { "token": backend.token } })),
    )
        .into_response()
}

async fn refresh(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Session not found" })),
        )
            .into_response();
    }
    if backend.empty_refresh {
        return Json(json!({ "result": {} })).into_response();
    }
    Json(json!({ "result": { "token": backend.token } })).into_response()
}

async fn logout(State(backend): State<Arc<Backend>>) -> Response {
    backend.logouts.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "result": { "message": "Logged out" } })).into_response()
}

async fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "").into_response()
}

async fn html_page() -> Response {
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

/// Serve `app` on an ephemeral port and point a client at it
async fn client_for(app: Router) -> HttpAuthApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpAuthApi::new(&ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_seconds: 5,
    })
    .unwrap()
}

/// Serve the mock backend on an ephemeral port
async fn spawn_backend(empty_refresh: bool) -> (Arc<Backend>, ApiConfig) {
    let backend = Arc::new(Backend {
        token: mint("admin@example.com", 1, Some(NOW + 1000)),
        empty_refresh,
        logouts: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/logout", post(logout))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_seconds: 5,
    };
    (backend, config)
}

fn manager_for(api: HttpAuthApi, navigator: Arc<MemoryNavigator>) -> SessionManager {
    SessionManager::with_clock(
        Arc::new(api),
        navigator,
        Arc::new(ManualClock::new(NOW)),
        &SessionConfig::default(),
    )
}

#[tokio::test]
async fn test_login_error_message_is_surfaced() {
    let (_backend, config) = spawn_backend(false).await;
    let api = HttpAuthApi::new(&config).unwrap();

    let err = api.login("admin@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(
        err.display_message(),
        "The email or password is incorrect. Try again."
    );
}

#[tokio::test]
async fn test_refresh_requires_session_cookie() {
    let (backend, config) = spawn_backend(false).await;
    let api = HttpAuthApi::new(&config).unwrap();

    let err = api.refresh().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.display_message(), "Session not found");

    let login = api.login("admin@example.com", "secret").await.unwrap();
    assert_eq!(login.token.as_deref(), Some(backend.token.as_str()));

    let refreshed = api.refresh().await.unwrap();
    assert_eq!(refreshed.token.as_deref(), Some(backend.token.as_str()));
}

#[tokio::test]
async fn test_status_without_envelope_maps_to_kind() {
    let api = client_for(Router::new().route("/api/v1/auth/refresh", post(forbidden))).await;

    let err = api.refresh().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.display_message(), "HTTP 403: Forbidden");

    let err = api.logout().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
}

#[tokio::test]
async fn test_session_over_http() {
    let (backend, config) = spawn_backend(false).await;
    let navigator = Arc::new(MemoryNavigator::new());
    let manager = manager_for(HttpAuthApi::new(&config).unwrap(), navigator.clone());

    // No cookie yet, so the ambient session does not exist.
    assert_eq!(manager.start().await, SessionPhase::Unauthenticated);
    assert_eq!(navigator.redirect_count(), 1);

    let auth = manager.login("admin@example.com", "secret").await.unwrap();
    assert_eq!(auth.role, RoleLabel::Admin);
    assert_eq!(manager.phase(), SessionPhase::Authenticated);

    let outcome = manager.silent_refresh().await;
    assert!(matches!(outcome, RefreshOutcome::Renewed(ref a) if a.email == "admin@example.com"));
    assert!(manager.has_pending_refresh());

    manager.logout().await;
    assert_eq!(backend.logouts.load(Ordering::SeqCst), 1);
    assert!(manager.token().is_none());
    assert_eq!(navigator.redirect_count(), 2);
    manager.dispose();
}

#[tokio::test]
async fn test_refresh_without_token_ends_session_over_http() {
    let (_backend, config) = spawn_backend(true).await;
    let navigator = Arc::new(MemoryNavigator::new());
    let manager = manager_for(HttpAuthApi::new(&config).unwrap(), navigator.clone());
    manager.login("admin@example.com", "secret").await.unwrap();

    let outcome = manager.silent_refresh().await;

    assert_eq!(outcome, RefreshOutcome::Failed);
    assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
    assert!(!manager.has_pending_refresh());
    assert_eq!(navigator.redirect_count(), 1);
    manager.dispose();
}

#[tokio::test]
async fn test_unreadable_success_body_is_reported() {
    let api = client_for(
        Router::new()
            .route("/api/v1/auth/login", post(html_page))
            .route("/api/v1/auth/refresh", post(html_page)),
    )
    .await;

    let err = api.login("admin@example.com", "secret").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Serialization);

    let err = api.refresh().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Serialization);
}

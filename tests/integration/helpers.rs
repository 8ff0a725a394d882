//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::Notify;

use console_auth::{MemoryNavigator, SessionManager, SessionSnapshot};
use console_core::config::SessionConfig;
use console_core::error::AppError;
use console_core::result::AppResult;
use console_core::traits::{AuthApi, Clock, TokenResponse};

/// Fixed starting point for the manual clock
pub const NOW: i64 = 1_700_000_000;

/// Sign a token the way the backend does; the client never checks the key
pub fn mint(email: &str, role_id: i64, exp: Option<i64>) -> String {
    let mut claims = serde_json::json!({ "email": email, "role_id": role_id });
    if let Some(exp) = exp {
        claims["exp"] = serde_json::json!(exp);
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .expect("Failed to mint token")
}

/// Clock the test moves by hand
#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scripted backend: queued responses, call counters, and an optional gate
/// that holds refresh calls open until released
#[derive(Debug, Default)]
pub struct FakeAuthApi {
    refresh_responses: Mutex<VecDeque<AppResult<TokenResponse>>>,
    login_response: Mutex<Option<AppResult<TokenResponse>>>,
    logout_response: Mutex<Option<AppResult<()>>>,
    gate: Mutex<Option<Arc<Notify>>>,
    crash_refresh: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the next refresh result. With an empty queue, refresh fails as
    /// if no server-side session existed.
    pub fn queue_refresh(&self, response: AppResult<TokenResponse>) {
        self.refresh_responses.lock().unwrap().push_back(response);
    }

    pub fn queue_refresh_token(&self, token: &str) {
        self.queue_refresh(Ok(TokenResponse::with_token(token)));
    }

    pub fn set_login(&self, response: AppResult<TokenResponse>) {
        *self.login_response.lock().unwrap() = Some(response);
    }

    pub fn set_logout(&self, response: AppResult<()>) {
        *self.logout_response.lock().unwrap() = Some(response);
    }

    /// Make every refresh call wait until `notify_one` is called on the
    /// returned gate
    pub fn hold_refresh(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Make refresh calls panic, as a crashing transport would
    pub fn crash_refresh(&self) {
        self.crash_refresh.store(true, Ordering::SeqCst);
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> AppResult<TokenResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(AppError::authentication("Invalid email or password")))
    }

    async fn refresh(&self) -> AppResult<TokenResponse> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.crash_refresh.load(Ordering::SeqCst) {
            panic!("refresh transport crashed");
        }
        self.refresh_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::authentication("No active session")))
    }

    async fn logout(&self) -> AppResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_response.lock().unwrap().clone().unwrap_or(Ok(()))
    }
}

/// Test session context
pub struct TestSession {
    pub api: Arc<FakeAuthApi>,
    pub navigator: Arc<MemoryNavigator>,
    pub clock: Arc<ManualClock>,
    pub manager: SessionManager,
}

impl TestSession {
    /// Create a session with a fresh backend, history and clock
    pub fn new() -> Self {
        Self::with_navigator(Arc::new(MemoryNavigator::new()))
    }

    /// Create a session over an existing navigation history
    pub fn with_navigator(navigator: Arc<MemoryNavigator>) -> Self {
        Self::with_parts(FakeAuthApi::new(), navigator)
    }

    /// Create a session sharing a backend and history, like a page reload
    pub fn with_parts(api: Arc<FakeAuthApi>, navigator: Arc<MemoryNavigator>) -> Self {
        let clock = Arc::new(ManualClock::new(NOW));
        let manager = SessionManager::with_clock(
            api.clone(),
            navigator.clone(),
            clock.clone(),
            &SessionConfig::default(),
        );
        Self {
            api,
            navigator,
            clock,
            manager,
        }
    }

    /// Wait until the published session satisfies `predicate`
    pub async fn wait_for(&self, predicate: impl FnMut(&SessionSnapshot) -> bool) -> SessionSnapshot {
        let mut rx = self.manager.subscribe();
        tokio::time::timeout(Duration::from_secs(24 * 3600), rx.wait_for(predicate))
            .await
            .expect("Timed out waiting for session state")
            .expect("Session state channel closed")
            .clone()
    }
}

/// Let spawned tasks run without advancing time
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

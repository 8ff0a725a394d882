//! Navigation handoff integration tests.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use console_auth::{MemoryNavigator, SessionPhase};
use helpers::{FakeAuthApi, NOW, TestSession, mint};

#[tokio::test(start_paused = true)]
async fn test_handoff_is_consumed_once() {
    let api = FakeAuthApi::new();
    let navigator = Arc::new(MemoryNavigator::with_handoff(mint(
        "admin@example.com",
        1,
        Some(NOW + 1000),
    )));

    let first = TestSession::with_parts(api.clone(), navigator.clone());
    assert_eq!(first.manager.start().await, SessionPhase::Authenticated);
    assert_eq!(api.refresh_count(), 0);
    assert!(!navigator.has_handoff());
    first.manager.dispose();
    drop(first);

    // Reloading the page finds no handoff and asks the backend instead.
    api.queue_refresh_token(&mint("admin@example.com", 1, Some(NOW + 1000)));
    let reloaded = TestSession::with_parts(api.clone(), navigator.clone());
    assert_eq!(reloaded.manager.start().await, SessionPhase::Authenticated);
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(navigator.redirect_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unusable_handoff_falls_back_to_refresh() {
    let navigator = Arc::new(MemoryNavigator::with_handoff("definitely.not.a-token"));
    let ctx = TestSession::with_navigator(navigator);
    let token = mint("ops@example.com", 2, Some(NOW + 1000));
    ctx.api.queue_refresh_token(&token);

    let phase = ctx.manager.start().await;

    assert_eq!(phase, SessionPhase::Authenticated);
    assert_eq!(ctx.api.refresh_count(), 1);
    assert_eq!(ctx.manager.token().as_deref(), Some(token.as_str()));
    assert!(!ctx.navigator.has_handoff());
}

#[tokio::test(start_paused = true)]
async fn test_expiring_handoff_renews_at_floor() {
    let navigator = Arc::new(MemoryNavigator::with_handoff(mint(
        "net@example.com",
        3,
        Some(NOW + 90),
    )));
    let ctx = TestSession::with_navigator(navigator);

    ctx.manager.start().await;

    assert!(ctx.manager.is_ready());
    assert_eq!(
        ctx.manager.pending_refresh_delay(),
        Some(Duration::from_millis(5000))
    );
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_dispose_resumes_session() {
    let navigator = Arc::new(MemoryNavigator::with_handoff(mint(
        "admin@example.com",
        1,
        Some(NOW + 1000),
    )));
    let ctx = TestSession::with_navigator(navigator);
    ctx.manager.start().await;
    ctx.manager.dispose();
    assert!(!ctx.manager.has_pending_refresh());

    ctx.api
        .queue_refresh_token(&mint("admin@example.com", 1, Some(NOW + 1000)));
    let phase = ctx.manager.start().await;

    assert_eq!(phase, SessionPhase::Authenticated);
    assert_eq!(ctx.api.refresh_count(), 1);
    assert!(ctx.manager.has_pending_refresh());
}

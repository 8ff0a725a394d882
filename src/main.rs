//! Console session agent.
//!
//! Keeps a network-core console session alive from the command line: picks
//! up a handed-off token or the ambient server session, renews it ahead of
//! expiry, and logs every transition until interrupted.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use console_auth::{MemoryNavigator, SessionManager, SessionPhase};
use console_client::HttpAuthApi;
use console_core::config::AppConfig;
use console_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Agent error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CONSOLE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main agent run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        "Starting console agent v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let api = Arc::new(HttpAuthApi::new(&config.api)?);
    let navigator = Arc::new(MemoryNavigator::new());
    if let Ok(token) = std::env::var("CONSOLE_HANDOFF_TOKEN") {
        navigator.push_handoff(token);
    }

    let manager = SessionManager::new(api, navigator, &config.session);
    let mut phase = manager.start().await;

    if phase == SessionPhase::Unauthenticated {
        phase = login_from_env(&manager).await?;
    }
    tracing::info!(phase = %phase, "Session initialised");

    #[cfg(unix)]
    spawn_visibility_signals(&manager)?;

    let mut updates = manager.subscribe();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, logging out");
                manager.logout().await;
                break Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break Err(AppError::internal("Session state channel closed"));
                }
                let snapshot = updates.borrow_and_update().clone();
                tracing::info!(
                    phase = %snapshot.phase,
                    email = snapshot.auth.as_ref().map(|a| a.email.as_str()).unwrap_or("-"),
                    next_refresh_ms = manager.pending_refresh_delay().map(|d| d.as_millis() as u64),
                    "Session state changed"
                );
                if snapshot.phase == SessionPhase::Unauthenticated {
                    break Err(AppError::session("Session ended, log in again"));
                }
            }
        }
    };

    manager.dispose();
    result
}

/// Log in with `CONSOLE_EMAIL` / `CONSOLE_PASSWORD` when both are set
async fn login_from_env(manager: &SessionManager) -> Result<SessionPhase, AppError> {
    let (Ok(email), Ok(password)) = (
        std::env::var("CONSOLE_EMAIL"),
        std::env::var("CONSOLE_PASSWORD"),
    ) else {
        return Err(AppError::authentication(
            "No active session; set CONSOLE_EMAIL and CONSOLE_PASSWORD to log in",
        ));
    };

    let auth = manager.login(&email, &password).await?;
    tracing::info!(email = %auth.email, role = %auth.role, "Logged in from environment");
    Ok(manager.phase())
}

/// Map SIGUSR1/SIGUSR2 to the UI going to background/foreground
#[cfg(unix)]
fn spawn_visibility_signals(manager: &SessionManager) -> Result<(), AppError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hidden = signal(SignalKind::user_defined1())?;
    let mut visible = signal(SignalKind::user_defined2())?;
    let handle = manager.visibility();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = hidden.recv() => {
                    tracing::debug!("SIGUSR1: marking hidden");
                    handle.hidden();
                }
                Some(()) = visible.recv() => {
                    tracing::debug!("SIGUSR2: marking visible");
                    handle.visible();
                }
                else => break,
            }
        }
    });
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

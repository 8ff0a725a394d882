//! Interactive login check.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use console_auth::{ClaimsDecoder, MemoryNavigator, SessionManager};
use console_client::HttpAuthApi;
use console_core::error::AppError;

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password; prompted for when omitted
    #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Leave the server-side session open instead of logging out afterwards
    #[arg(long)]
    pub keep_session: bool,
}

/// Login result view
#[derive(Debug, Serialize)]
struct LoginView {
    email: String,
    role: String,
    can_manage_users: bool,
    can_edit_network: bool,
    expires_at: Option<String>,
    next_refresh_ms: Option<u128>,
}

/// Execute the login command
pub async fn execute(
    args: &LoginArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for {}", args.email))
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let api = Arc::new(HttpAuthApi::new(&config.api)?);
    let manager = SessionManager::new(api, Arc::new(MemoryNavigator::new()), &config.session);

    let auth = manager.login(&args.email, &password).await?;
    let exp = manager
        .token()
        .and_then(|t| ClaimsDecoder::new().decode(&t).ok())
        .and_then(|c| c.exp);

    let view = LoginView {
        email: auth.email.clone(),
        role: auth.role.to_string(),
        can_manage_users: auth.role.can_manage_users(),
        can_edit_network: auth.role.can_edit_network(),
        expires_at: exp.map(super::format_timestamp),
        next_refresh_ms: manager.pending_refresh_delay().map(|d| d.as_millis()),
    };

    if format == OutputFormat::Table {
        output::print_success(&format!("Logged in as {}", view.email));
    }
    let rows = [
        ("Role", view.role.clone()),
        ("Manage users", view.can_manage_users.to_string()),
        ("Edit network", view.can_edit_network.to_string()),
        (
            "Expires",
            view.expires_at.clone().unwrap_or_else(|| "never".to_string()),
        ),
        (
            "Next refresh",
            view.next_refresh_ms
                .map(|ms| format!("{ms}ms"))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];
    output::print_record(&rows, &view, format);

    if !args.keep_session {
        manager.logout().await;
    }
    manager.dispose();

    Ok(())
}

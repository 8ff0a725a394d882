//! Token inspection.

use std::io::Read;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use console_auth::{ClaimsDecoder, ExpiryPolicy};
use console_core::error::AppError;
use console_core::traits::{Clock, SystemClock};

/// Arguments for the decode command
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Token to inspect, or `-` to read it from stdin
    pub token: String,
}

/// Decoded token view
#[derive(Debug, Serialize)]
struct TokenView {
    email: String,
    role_id: i64,
    role: String,
    expires_at: Option<String>,
    remaining_seconds: Option<i64>,
    expiring_soon: bool,
    next_refresh_ms: u128,
}

/// Execute the decode command
pub fn execute(args: &DecodeArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let token = read_token(&args.token)?;

    let claims = ClaimsDecoder::new().decode(&token)?;
    let policy = ExpiryPolicy::from_config(&config.session);
    let now = SystemClock.now_unix();
    let auth = claims.auth_state();

    let view = TokenView {
        email: auth.email.clone(),
        role_id: claims.role_id,
        role: auth.role.to_string(),
        expires_at: claims.exp.map(super::format_timestamp),
        remaining_seconds: claims.remaining_seconds(now),
        expiring_soon: policy.is_expiring_soon(&claims, now),
        next_refresh_ms: if policy.is_expiring_soon(&claims, now) {
            policy.min_delay.as_millis()
        } else {
            policy.refresh_delay(&claims, now).as_millis()
        },
    };

    let rows = [
        ("Email", view.email.clone()),
        ("Role", format!("{} ({})", view.role, view.role_id)),
        (
            "Expires",
            view.expires_at.clone().unwrap_or_else(|| "never".to_string()),
        ),
        (
            "Remaining",
            view.remaining_seconds
                .map(|s| format!("{s}s"))
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Expiring soon", view.expiring_soon.to_string()),
        ("Next refresh", format!("{}ms", view.next_refresh_ms)),
    ];
    output::print_record(&rows, &view, format);

    if view.expiring_soon && format == OutputFormat::Table {
        output::print_warning("Token is inside the renewal leeway window");
    }

    Ok(())
}

fn read_token(arg: &str) -> Result<String, AppError> {
    if arg != "-" {
        return Ok(arg.trim().to_string());
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

//! CLI command definitions and dispatch.

pub mod decode;
pub mod login;
pub mod roles;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use console_core::config::AppConfig;
use console_core::error::AppError;

/// Network-core console session tools
#[derive(Debug, Parser)]
#[command(name = "console-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in against the backend and show the resulting identity
    Login(login::LoginArgs),
    /// Show the claims and renewal timing of a token
    Decode(decode::DecodeArgs),
    /// List the roles the console recognises
    Roles,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => login::execute(args, &self.config, self.format).await,
            Commands::Decode(args) => decode::execute(args, &self.config, self.format),
            Commands::Roles => {
                roles::execute(self.format);
                Ok(())
            }
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: render a Unix timestamp for display
pub fn format_timestamp(unix: i64) -> String {
    chrono::DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| unix.to_string())
}

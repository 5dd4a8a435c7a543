//! CLI command definitions and dispatch.

pub mod config;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use playhub_core::config::AppConfig;
use playhub_core::error::AppError;

/// Playhub: real-time connection server tools
#[derive(Debug, Parser)]
#[command(name = "playhub-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment; selects `config/{env}.toml` on top of the defaults
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log more (`-v` debug, `-vv` trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Issue a signed handshake token
    Token(token::TokenArgs),
    /// Load and print the effective configuration
    CheckConfig,
}

impl Cli {
    /// Log filter implied by `--verbose`.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Token(args) => token::execute(args, &self.env, self.format).await,
            Commands::CheckConfig => config::execute(&self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for `env`
pub async fn load_config(env: &str) -> Result<AppConfig, AppError> {
    let config = AppConfig::load(env)?;
    tracing::debug!(env, backend = %config.cache.backend, "Configuration loaded");
    Ok(config)
}

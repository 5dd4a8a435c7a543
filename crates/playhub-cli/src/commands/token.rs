//! Handshake token issuing.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use playhub_auth::HandshakeEncoder;
use playhub_core::config::auth::AuthConfig;
use playhub_core::error::AppError;
use playhub_core::types::UserId;

/// Arguments for `token`
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// User id placed in the token subject
    #[arg(short, long)]
    pub user: String,
    /// Session key for envelope encryption; omit for plaintext sessions
    #[arg(short, long)]
    pub key: Option<String>,
    /// Lifetime in seconds (defaults to `auth.token_ttl_seconds`)
    #[arg(short, long)]
    pub ttl: Option<i64>,
}

/// A freshly issued token.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    /// Subject user id.
    pub user_id: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Signed JWT.
    pub token: String,
}

/// Execute `token`
pub async fn execute(args: &TokenArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env).await?;
    let issued = issue(&config.auth, args)?;

    match format {
        OutputFormat::Text => println!("{}", issued.token),
        OutputFormat::Json => output::print_item(&issued, format),
    }
    Ok(())
}

/// Signs a token for `args.user` with the configured secret.
pub fn issue(auth: &AuthConfig, args: &TokenArgs) -> Result<IssuedToken, AppError> {
    let user_id = UserId::parse(args.user.as_str())
        .ok_or_else(|| AppError::validation("User id must not be empty"))?;
    let ttl = args.ttl.unwrap_or(auth.token_ttl_seconds as i64);
    if ttl <= 0 {
        return Err(AppError::validation("TTL must be positive"));
    }

    let token = HandshakeEncoder::new(auth).issue_with_ttl(&user_id, args.key.as_deref(), ttl)?;

    Ok(IssuedToken {
        user_id: user_id.to_string(),
        expires_in: ttl,
        token,
    })
}

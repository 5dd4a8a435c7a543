//! `check-config`: load, sanity-check and print the effective configuration.

use crate::output::{self, OutputFormat};
use playhub_core::config::AppConfig;
use playhub_core::config::cache::CacheBackend;
use playhub_core::error::AppError;

const PLACEHOLDER_SECRET: &str = "change-me-in-production";

/// Execute `check-config`
pub async fn execute(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env).await?;

    output::print_item(&redacted(&config), format);

    let warnings = review(&config);
    for warning in &warnings {
        output::print_warning(warning);
    }
    if warnings.is_empty() {
        output::print_success(&format!("Configuration for '{}' is valid", env));
    }
    Ok(())
}

/// Copy of `config` safe to print.
fn redacted(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    shown.auth.jwt_secret = mask(&shown.auth.jwt_secret);
    shown.upstream.api_key = mask(&shown.upstream.api_key);
    shown
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}

/// Settings that load fine but will misbehave at runtime.
pub fn review(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.auth.jwt_secret == PLACEHOLDER_SECRET {
        warnings.push("auth.jwt_secret is still the placeholder value".to_string());
    }
    if !config.auth.require_token {
        warnings.push("auth.require_token is off; anonymous sockets are accepted".to_string());
    }
    if config.realtime.send_buffer_size == 0 {
        warnings.push("realtime.send_buffer_size of 0 is raised to 1".to_string());
    }
    if config.cache.backend == CacheBackend::Memory {
        warnings.push("cache.backend is memory; sessions are lost on restart".to_string());
    }
    if config.upstream.base_url.is_empty() {
        warnings.push("upstream.base_url is empty; offline notifications will fail".to_string());
    }
    if config.upstream.public_key.trim().is_empty() {
        warnings.push("upstream.public_key is empty; offline notifications will fail".to_string());
    }

    warnings
}

use std::path::PathBuf;

use crate::app_config::{AppConfig, TransportKind};
use crate::ConfigError;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_RESULT_LIMIT: u32 = 20;
pub const DEFAULT_USER_AGENT: &str = "bizsearch/0.1 (business-search)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let service_url = or_default("BIZSEARCH_SERVICE_URL", DEFAULT_SERVICE_URL);
    if service_url.trim().is_empty() {
        return Err(invalid(
            "BIZSEARCH_SERVICE_URL",
            "must not be empty".to_string(),
        ));
    }

    let transport = or_default("BIZSEARCH_TRANSPORT", "get")
        .parse::<TransportKind>()
        .map_err(|reason| invalid("BIZSEARCH_TRANSPORT", reason))?;

    let timeout_ms = parse_u64("BIZSEARCH_TIMEOUT_MS", &DEFAULT_TIMEOUT_MS.to_string())?;
    if timeout_ms == 0 {
        return Err(invalid(
            "BIZSEARCH_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let result_limit = parse_u32("BIZSEARCH_RESULT_LIMIT", &DEFAULT_RESULT_LIMIT.to_string())?;
    let user_agent = or_default("BIZSEARCH_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("BIZSEARCH_LOG_LEVEL", "warn");
    let fallback_path = lookup("BIZSEARCH_FALLBACK_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let fallback_enabled = parse_bool(&or_default("BIZSEARCH_FALLBACK_ENABLED", "true"))
        .ok_or_else(|| {
            invalid(
                "BIZSEARCH_FALLBACK_ENABLED",
                "expected true/false, 1/0, or yes/no".to_string(),
            )
        })?;

    Ok(AppConfig {
        service_url,
        transport,
        timeout_ms,
        result_limit,
        user_agent,
        log_level,
        fallback_path,
        fallback_enabled,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

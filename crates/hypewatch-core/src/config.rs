use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("HYPEWATCH_ENV", "development"))?;

    let bind_addr = parse_addr("HYPEWATCH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HYPEWATCH_LOG_LEVEL", "info");
    let brands_path = PathBuf::from(or_default(
        "HYPEWATCH_BRANDS_PATH",
        "./config/brands.yaml",
    ));
    let data_dir = PathBuf::from(or_default("HYPEWATCH_DATA_DIR", "./data"));
    let store_dir = PathBuf::from(or_default("HYPEWATCH_STORE_DIR", "./store"));

    let top_hashtags = parse_usize("HYPEWATCH_TOP_HASHTAGS", "10")?;
    if top_hashtags == 0 {
        return Err(invalid(
            "HYPEWATCH_TOP_HASHTAGS",
            "must be at least 1".to_string(),
        ));
    }

    let refresh_cron = or_default("HYPEWATCH_REFRESH_CRON", "0 */15 * * * *");
    if refresh_cron.split_whitespace().count() != 6 {
        return Err(invalid(
            "HYPEWATCH_REFRESH_CRON",
            format!("expected 6 cron fields, got '{refresh_cron}'"),
        ));
    }

    let rate_limit_per_minute = parse_usize("HYPEWATCH_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        brands_path,
        data_dir,
        store_dir,
        top_hashtags,
        refresh_cron,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HYPEWATCH_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

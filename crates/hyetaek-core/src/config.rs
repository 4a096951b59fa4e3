use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_timeout = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(secs)
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("HYETAEK_ENV", "development"))?;
    let log_level = or_default("HYETAEK_LOG_LEVEL", "info");

    let gemini_model = or_default("HYETAEK_GEMINI_MODEL", "gemini-2.5-flash");
    let gemini_base_url = or_default(
        "HYETAEK_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com/",
    );
    let request_timeout_secs = parse_timeout("HYETAEK_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("HYETAEK_USER_AGENT", "hyetaek-on/0.1 (discount-discovery)");

    let data_dir = PathBuf::from(or_default("HYETAEK_DATA_DIR", "./.hyetaek"));
    let catalog_path = PathBuf::from(or_default("HYETAEK_CATALOG_PATH", "./config/catalog.yaml"));

    let geolocation_url = or_default("HYETAEK_GEOLOCATION_URL", "https://ipapi.co/json/");
    let geolocation_timeout_secs = parse_timeout("HYETAEK_GEOLOCATION_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        request_timeout_secs,
        user_agent,
        data_dir,
        catalog_path,
        geolocation_url,
        geolocation_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HYETAEK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

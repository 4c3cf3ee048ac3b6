use log::{info, warn, Level};
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} must start with http:// or https:// (got `{value}`)")]
    InvalidUrl { key: &'static str, value: String },

    #[error("{key} is not a log level (got `{value}`)")]
    InvalidLevel { key: &'static str, value: String },
}

/// Build-time settings, resolved once in `main` and shared through context.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: Level,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: Level::Info,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_values(
            option_env!("PORTAL_API_BASE_URL"),
            option_env!("PORTAL_LOG_LEVEL"),
            option_env!("PORTAL_CURRENCY_SYMBOL"),
        )
    }

    fn from_values(base_url: Option<&str>, level: Option<&str>, symbol: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: try_load("PORTAL_API_BASE_URL", base_url, DEFAULT_API_BASE_URL, parse_base_url)
                .unwrap_or(defaults.api_base_url),
            log_level: try_load("PORTAL_LOG_LEVEL", level, DEFAULT_LOG_LEVEL, parse_level)
                .unwrap_or(defaults.log_level),
            currency_symbol: try_load(
                "PORTAL_CURRENCY_SYMBOL",
                symbol,
                DEFAULT_CURRENCY_SYMBOL,
                parse_symbol,
            )
            .unwrap_or(defaults.currency_symbol),
        }
    }

    /// Joins a relative API path onto the base URL with exactly one slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Logger threshold, read without logging so it can run before the logger exists.
pub fn log_level() -> Level {
    option_env!("PORTAL_LOG_LEVEL")
        .and_then(|raw| Level::from_str(raw.trim()).ok())
        .unwrap_or(Level::Info)
}

fn try_load<T>(
    key: &'static str,
    raw: Option<&str>,
    default: &str,
    parse: fn(&'static str, &str) -> Result<T, ConfigError>,
) -> Option<T> {
    let value = raw.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default
    });
    parse(key, value)
        .map_err(|e| warn!("Invalid configuration, using default: {e}"))
        .ok()
}

fn parse_base_url(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { key });
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_level(key: &'static str, value: &str) -> Result<Level, ConfigError> {
    Level::from_str(value.trim()).map_err(|_| ConfigError::InvalidLevel {
        key,
        value: value.to_string(),
    })
}

fn parse_symbol(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { key });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_use_defaults() {
        let config = AppConfig::from_values(None, None, None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn invalid_values_fall_back_individually() {
        let config = AppConfig::from_values(Some("ftp://x"), Some("debug"), Some("  "));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.log_level, Level::Debug);
        assert_eq!(config.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = AppConfig::from_values(Some("https://portal.example.gov/api/"), None, None);
        assert_eq!(config.api_base_url, "https://portal.example.gov/api");
        assert_eq!(
            config.endpoint("/expenses/"),
            "https://portal.example.gov/api/expenses/"
        );
        assert_eq!(config.endpoint("auth/me/"), "https://portal.example.gov/api/auth/me/");
    }

    #[test]
    fn parse_errors_name_the_key() {
        let err = parse_level("PORTAL_LOG_LEVEL", "loud").unwrap_err();
        assert_eq!(
            err.to_string(),
            "PORTAL_LOG_LEVEL is not a log level (got `loud`)"
        );
    }
}

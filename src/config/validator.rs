//! Parsing and validation of individual settings values.

use crate::config::settings::CorsOrigins;
use crate::error::ConfigError;

/// Accepted `LOG_LEVEL` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` has no critical level; it shares `error`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

pub fn parse_log_level(v: &str) -> Result<LogLevel, ConfigError> {
    match v.to_ascii_uppercase().as_str() {
        "DEBUG" => Ok(LogLevel::Debug),
        "INFO" => Ok(LogLevel::Info),
        "WARNING" | "WARN" => Ok(LogLevel::Warning),
        "ERROR" => Ok(LogLevel::Error),
        "CRITICAL" => Ok(LogLevel::Critical),
        _ => Err(ConfigError::Invalid {
            var: "LOG_LEVEL",
            reason: format!("{v} is not one of DEBUG, INFO, WARNING, ERROR, CRITICAL"),
        }),
    }
}

pub fn parse_port(v: &str) -> Result<u16, ConfigError> {
    match v.parse::<u16>() {
        Ok(p) if p >= 1 => Ok(p),
        _ => Err(ConfigError::Invalid {
            var: "PORT",
            reason: format!("{v} is not between 1 and 65535"),
        }),
    }
}

pub fn parse_max_connections(v: &str) -> Result<u32, ConfigError> {
    match v.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var: "DB_MAX_CONNECTIONS",
            reason: format!("{v} is not a positive integer"),
        }),
    }
}

pub fn parse_bool(var: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("{v} is not a boolean"),
        }),
    }
}

/// `*` means any origin; otherwise a comma-separated list.
pub fn parse_cors_origins(v: &str) -> Result<CorsOrigins, ConfigError> {
    if v == "*" {
        return Ok(CorsOrigins::Any);
    }
    let origins: Vec<String> = v
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        return Err(ConfigError::Invalid {
            var: "CORS_ORIGINS",
            reason: "no origins given".into(),
        });
    }
    if let Some(bad) = origins.iter().find(|o| o.parse::<axum::http::HeaderValue>().is_err()) {
        return Err(ConfigError::Invalid {
            var: "CORS_ORIGINS",
            reason: format!("{bad} is not a valid origin"),
        });
    }
    Ok(CorsOrigins::List(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!(parse_log_level("debug").unwrap(), LogLevel::Debug);
        assert_eq!(parse_log_level("CRITICAL").unwrap().as_filter(), "error");
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn bools() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn cors_wildcard_and_list() {
        assert_eq!(parse_cors_origins("*").unwrap(), CorsOrigins::Any);
        assert_eq!(
            parse_cors_origins("http://a.test,,").unwrap(),
            CorsOrigins::List(vec!["http://a.test".into()])
        );
        assert!(parse_cors_origins(" , ").is_err());
    }

    #[test]
    fn max_connections_must_be_positive() {
        assert_eq!(parse_max_connections("8").unwrap(), 8);
        assert!(parse_max_connections("0").is_err());
    }
}

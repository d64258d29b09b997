//! Configuration types for regex-role-changer
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// PT AI server connection settings
    pub server: ServerConfig,

    /// Credentials used to obtain a bearer token
    pub credentials: CredentialsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// PT AI server connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server URL (e.g., `https://ptai.example.com/`)
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 30,
            verify_ssl: true,
        }
    }
}

impl ServerConfig {
    /// Server URL with exactly one trailing slash, so endpoint paths can be appended
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }
}

/// Credentials configuration
///
/// Missing login or password values are prompted for on the terminal.
/// When `access_token` is set it is used instead of login/password.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub login: Option<String>,
    pub password: Option<SecretString>,
    pub access_token: Option<SecretString>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalises_trailing_slash() {
        let config = ServerConfig {
            url: "https://ptai.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://ptai.example.com/");

        let config = ServerConfig {
            url: "https://ptai.example.com//".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://ptai.example.com/");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.timeout_secs, 30);
        assert!(config.server.verify_ssl);
        assert!(config.credentials.login.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}

//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Command line flags
//! 2. Environment variables (RRC_*)
//! 3. Conventional PT AI variables (PTAI_URL, PTAI_LOGIN, ...)
//! 4. Configuration file (TOML)
//! 5. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "regex-role-changer.toml",
    ".regex-role-changer.toml",
    "~/.config/regex-role-changer/config.toml",
];

const ENV_PREFIX: &str = "RRC";

/// Conventional variables and the config keys they fill in.
/// The second element is the prefixed variable that takes precedence over them.
const CONVENIENCE_VARS: &[(&str, &str, &str)] = &[
    ("PTAI_URL", "RRC_SERVER__URL", "server.url"),
    ("PTAI_LOGIN", "RRC_CREDENTIALS__LOGIN", "credentials.login"),
    ("PTAI_PASSWORD", "RRC_CREDENTIALS__PASSWORD", "credentials.password"),
    (
        "PTAI_ACCESS_TOKEN",
        "RRC_CREDENTIALS__ACCESS_TOKEN",
        "credentials.access_token",
    ),
];

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub insecure: bool,
    pub log_level: Option<String>,
}

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files, environment and command line overrides
pub fn load_config(
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    builder = add_convenience_vars(builder)?;

    // e.g., RRC_SERVER__URL, RRC_CREDENTIALS__LOGIN
    // Double underscore (__) maps to nested keys (server.url).
    // Values stay strings so numeric-looking logins and passwords keep their
    // leading zeros; typed fields are converted on deserialization.
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );

    builder = apply_overrides(builder, overrides)?;

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Fill in PTAI_* variables unless their prefixed counterpart is set
fn add_convenience_vars(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, prefixed, key) in CONVENIENCE_VARS {
        if std::env::var_os(prefixed).is_some() {
            continue;
        }
        if let Ok(value) = std::env::var(var)
            && !value.is_empty()
        {
            builder = builder
                .set_override(*key, value)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
        }
    }
    Ok(builder)
}

fn apply_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(url) = &overrides.url {
        builder = builder
            .set_override("server.url", url.as_str())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    if overrides.insecure {
        builder = builder
            .set_override("server.verify_ssl", false)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    if let Some(level) = &overrides.log_level {
        builder = builder
            .set_override("logging.level", level.as_str())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    Ok(builder)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "server.url (set PTAI_URL or pass --url)".to_string(),
        });
    }

    if !config.server.url.starts_with("http://") && !config.server.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "server.url must start with http:// or https://, got: {}",
                config.server.url
            ),
        });
    }

    if config.server.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "server.timeout_secs must be greater than 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[server]
url = "https://ptai.example.com"

[credentials]
login = "admin"
password = "secret"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.url, "https://ptai.example.com");
        assert_eq!(config.credentials.login.as_deref(), Some("admin"));
        assert_eq!(
            config.credentials.password.as_ref().map(|p| p.expose_secret()),
            Some("secret")
        );
    }

    #[test]
    fn test_invalid_url_error() {
        let toml = r#"
[server]
url = "ptai.example.com"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_url_error() {
        let result = load_config_from_str("[credentials]\nlogin = \"admin\"\n");
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_zero_timeout_error() {
        let toml = r#"
[server]
url = "https://ptai.example.com"
timeout_secs = 0
"#;
        assert!(load_config_from_str(toml).is_err());
    }
}

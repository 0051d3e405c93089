//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Effective configuration from an optional file and a bind override.
///
/// A loaded file is validated by `load_config`; the result is validated
/// again only when the override changed it or no file was given.
pub fn resolve_config(path: Option<&Path>, bind: Option<String>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    match bind {
        Some(bind) => config.listener.bind_address = bind,
        None if path.is_some() => return Ok(config),
        None => {}
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:7000\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[timeouts]\nrequest_secs = 0\n[auth]\ncookie_name = \"\"").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("auth.cookie_name"));
        assert!(message.contains("timeouts.request_secs"));
    }

    #[test]
    fn test_overflowing_cookie_lifetime_rejected() {
        let err = parse_config("[auth]\ncookie_max_age_days = 9223372036854775").unwrap_err();
        assert!(err.to_string().contains("auth.cookie_max_age_days"));
    }

    #[test]
    fn test_resolve_applies_bind_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nenvironment = \"development\"").unwrap();

        let config = resolve_config(Some(file.path()), Some("127.0.0.1:7001".into())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7001");
        assert!(config.site.environment.is_development());

        let config = resolve_config(None, None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    }

    #[test]
    fn test_resolve_rejects_bad_bind_override() {
        let err = resolve_config(None, Some("not-an-address".into())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors[0].field == "listener.bind_address"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("listener = 3"), Err(ConfigError::Parse(_))));
    }
}

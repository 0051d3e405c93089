//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the cookie secret is long enough to sign with
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Minimum signing key length accepted by the cookie signer.
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

/// Longest accepted session cookie lifetime (about a hundred years).
pub const MAX_COOKIE_MAX_AGE_DAYS: i64 = 36_500;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.site.web_root.trim().is_empty() {
        errors.push(ValidationError::new("site.web_root", "must not be empty"));
    }

    let doc = &config.site.default_document;
    if doc.is_empty() || doc.contains('/') || doc.contains('\\') || doc == ".." {
        errors.push(ValidationError::new(
            "site.default_document",
            "must be a bare file name",
        ));
    }

    if config.auth.cookie_name.trim().is_empty() {
        errors.push(ValidationError::new("auth.cookie_name", "must not be empty"));
    }

    if let Some(secret) = &config.auth.cookie_secret {
        if secret.len() < MIN_COOKIE_SECRET_LEN {
            errors.push(ValidationError::new(
                "auth.cookie_secret",
                format!("must be at least {MIN_COOKIE_SECRET_LEN} bytes"),
            ));
        }
    }

    if !(1..=MAX_COOKIE_MAX_AGE_DAYS).contains(&config.auth.cookie_max_age_days) {
        errors.push(ValidationError::new(
            "auth.cookie_max_age_days",
            format!("must be between 1 and {MAX_COOKIE_MAX_AGE_DAYS}"),
        ));
    }

    if !config.auth.login_path.starts_with('/') {
        errors.push(ValidationError::new("auth.login_path", "must start with '/'"));
    }

    if config.note_service.timeout_secs == 0 {
        errors.push(ValidationError::new("note_service.timeout_secs", "must be positive"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be positive"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be positive"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address when metrics are enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.auth.cookie_secret = Some("short".into());
        config.site.default_document = "../index.html".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "site.default_document",
                "auth.cookie_secret",
                "timeouts.request_secs",
            ]
        );
    }

    #[test]
    fn test_cookie_lifetime_bounds() {
        let mut config = AppConfig::default();
        for days in [0, MAX_COOKIE_MAX_AGE_DAYS + 1, 9_223_372_036_854_775] {
            config.auth.cookie_max_age_days = days;
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors[0].field, "auth.cookie_max_age_days", "days {days}");
        }

        config.auth.cookie_max_age_days = MAX_COOKIE_MAX_AGE_DAYS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_long_secret_accepted() {
        let mut config = AppConfig::default();
        config.auth.cookie_secret = Some("k".repeat(MIN_COOKIE_SECRET_LEN));
        assert!(validate_config(&config).is_ok());
    }
}

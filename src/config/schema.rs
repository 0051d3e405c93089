//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static site and environment settings.
    pub site: SiteConfig,

    /// Session cookie and authentication settings.
    pub auth: AuthConfig,

    /// Remote note service settings.
    pub note_service: NoteServiceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Hosting environment. Development enables diagnostic error pages.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the single page and its assets.
    pub web_root: String,

    /// File served for directory requests such as `/`.
    pub default_document: String,

    /// Hosting environment.
    pub environment: Environment,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            web_root: "wwwroot".to_string(),
            default_document: "index.html".to_string(),
            environment: Environment::Production,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Name of the signed session cookie.
    pub cookie_name: String,

    /// Signing secret, at least 64 bytes. A random key is generated per
    /// process when absent, invalidating cookies on restart.
    pub cookie_secret: Option<String>,

    /// Cookie lifetime in days.
    pub cookie_max_age_days: i64,

    /// Where challenged requests are redirected.
    pub login_path: String,

    /// Redirect anonymous requests to `login_path` instead of passing them on.
    pub challenge: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "quickcreate.auth".to_string(),
            cookie_secret: None,
            cookie_max_age_days: 30,
            login_path: "/".to_string(),
            challenge: false,
        }
    }
}

/// Remote note service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NoteServiceConfig {
    /// Timeout for the credential exchange in seconds.
    pub timeout_secs: u64,

    /// Hosts a sign-in may name as its note service. Empty allows any host.
    pub allowed_hosts: Vec<String>,
}

impl Default for NoteServiceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            allowed_hosts: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.site.default_document, "index.html");
        assert_eq!(config.site.environment, Environment::Production);
        assert!(!config.auth.challenge);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [site]
            environment = "development"

            [auth]
            cookie_name = "notes"
            challenge = true
            "#,
        )
        .unwrap();

        assert!(config.site.environment.is_development());
        assert_eq!(config.site.web_root, "wwwroot");
        assert_eq!(config.auth.cookie_name, "notes");
        assert!(config.auth.challenge);
        assert_eq!(config.auth.cookie_max_age_days, 30);
    }
}

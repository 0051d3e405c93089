//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to pipeline, note service, server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError};
pub use schema::{
    AppConfig, AuthConfig, Environment, ListenerConfig, NoteServiceConfig, ObservabilityConfig,
    SecurityConfig, SiteConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError, MAX_COOKIE_MAX_AGE_DAYS};

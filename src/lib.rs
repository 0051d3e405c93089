//! QuickCreate web backend library.
//!
//! Serves a single-page site, exchanges note service credentials for a
//! signed session cookie, and gates protected sub-applications behind it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notes;
pub mod observability;
pub mod routing;
pub mod signin;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Pipeline stages.
//!
//! Each stage is an axum `from_fn` middleware of shape
//! `(request, next) -> response`. `Next::run` consumes `next`, so a stage
//! can continue the chain at most once; returning without calling it
//! ends the chain.

pub mod auth;
pub mod diagnostics;
pub mod routes;
pub mod static_files;

pub use auth::{auth_gate_stage, cookie_auth_stage, CookieAuth, Identity, UNAUTHENTICATED_BODY};
pub use diagnostics::{diagnostics_stage, panic_response, HandlerFault};
pub use routes::route_stage;
pub use static_files::{default_document_stage, static_files_stage, StaticSite};

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, route registration, graceful shutdown)
//!     → request.rs (request ID assignment and propagation)
//!     → pipeline.rs (fixed stage order, see middleware/)
//!     → handlers.rs (route targets and mounted sub-applications)
//!     → response.rs (text, HTML and 404 helpers)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod server;

pub use pipeline::Pipeline;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_routes, HttpServer, ServerError};

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, host, path)
//!     → table.rs (entries in registration order)
//!     → template.rs (match path, extract placeholder values)
//!     → constraint.rs (evaluate every constraint, AND semantics)
//!     → Return: MatchContext or the untouched request
//!
//! Matched request:
//!     → dispatch.rs (run the bound handler, tag response as handled)
//!
//! Route Registration (at startup):
//!     RouteTableBuilder::register(name, template, options, handler)
//!     → Parse template, reject duplicate names
//!     → build() freezes as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - First match wins (ordered by registration)
//! - Duplicate route names fail fast at registration
//! - `engine.rs` hides the matcher so the pipeline never depends on it

pub mod constraint;
pub mod dispatch;
pub mod engine;
pub mod table;
pub mod template;

use thiserror::Error;

pub use constraint::{fn_constraint, AndConstraint, Constraint, FnConstraint, HttpMethodConstraint};
pub use dispatch::{handler_fn, DelegatingHandler, Handled, HandlerError, MatchContext, RouteHandler};
pub use engine::RouteEngine;
pub use table::{RouteEntry, RouteOptions, RouteTable, RouteTableBuilder};
pub use template::{RouteTemplate, RouteValues};

/// Errors raised while registering routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A route with the same name was already registered.
    #[error("route '{0}' is already registered")]
    DuplicateName(String),

    /// The URL template could not be parsed.
    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

//! Note service collaborator.
//!
//! # Data Flow
//! ```text
//! Sign-in handshake
//!     → NoteService::exchange_credential(token, url)
//!         → client.rs (HTTP exchange with the remote note service)
//!         → session.rs (process-wide session state updated)
//!     → NoteService::current_session()
//! ```
//!
//! # Design Decisions
//! - The session is an injected capability, never a hidden global
//! - Exchange failures are logged and leave the session unauthenticated;
//!   callers observe the outcome through `current_session`
//! - One session per process, created at startup

pub mod client;
pub mod session;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use client::HttpNoteService;
pub use session::{NoteSession, SharedNoteSession};

/// Errors from talking to the remote note service.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    /// Token or URL was not supplied.
    #[error("missing credential field: {0}")]
    MissingCredential(&'static str),

    /// The supplied service URL is not a valid absolute http(s) URL.
    #[error("invalid note service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The service URL names a host outside `note_service.allowed_hosts`.
    #[error("note service host '{0}' is not allowed")]
    HostNotAllowed(String),

    /// Transport failure.
    #[error("note service request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("note service rejected credential with status {0}")]
    Rejected(u16),

    /// The service answered without a usable user name.
    #[error("note service response carried no user name")]
    MissingName,
}

/// Capability consumed by the sign-in handshake.
pub trait NoteService: Send + Sync {
    /// Exchange a token/url pair for a session. Missing inputs fail the
    /// exchange; the outcome is visible through `current_session`.
    fn exchange_credential(&self, token: Option<String>, url: Option<String>) -> BoxFuture<'_, ()>;

    /// Snapshot of the session after the last exchange.
    fn current_session(&self) -> NoteSession;
}

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging/metrics
//!     → Build note service + pipeline → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain → Exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_shutdown, Shutdown};

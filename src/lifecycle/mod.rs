//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → health monitor and request drivers stop
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

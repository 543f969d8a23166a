//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request into a capacity-limited balancer:
//!     → capacity.rs (take an in-flight slot, compare against limit x providers)
//!     → over the bound: fail fast with CapacityExceeded
//!     → otherwise: delegate to the wrapped balancer, release the slot on exit
//! ```
//!
//! # Design Decisions
//! - Requests are never queued; rejection is immediate
//! - No internal retries; retry policy belongs to the caller

pub mod capacity;

pub use capacity::CapacityLimited;

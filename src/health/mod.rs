//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → tracker.rs inspect_all()
//!     → probe each tracked provider (state.rs)
//!     → on transition: add to / remove from the wrapped balancer
//!
//! State machine (state.rs):
//!     Dead → Recovering → Healthy
//!     Any failed probe drops straight to Dead
//! ```
//!
//! # Design Decisions
//! - Visibility is earned: only Healthy providers reach the wrapped balancer
//! - Two consecutive successes are required, one failure suffices
//! - Health state is per provider id, owned by the tracker

pub mod active;
pub mod state;
pub mod tracker;

pub use active::HealthMonitor;
pub use state::ProviderHealth;
pub use tracker::{HealthChecked, TrackedProvider};

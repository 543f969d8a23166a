//! Provider health state machine.
//!
//! # States
//! - Dead: last probe failed
//! - Recovering: one successful probe since being added or since dying
//! - Healthy: provider receives traffic
//!
//! # State Transitions
//! ```text
//! any  → Dead:        probe fails
//! new  → Recovering:  probe succeeds
//! Dead → Recovering:  probe succeeds
//! Recovering → Healthy, Healthy → Healthy: probe succeeds
//! ```
//!
//! Two consecutive successful probes are required before a provider is
//! declared healthy, which keeps a flapping provider out of rotation.

use std::fmt;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use crate::load_balancer::provider::Provider;

/// Health of a tracked provider.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderHealth {
    Dead = 0,
    Recovering = 1,
    Healthy = 2,
}

impl ProviderHealth {
    /// Compute the next state from a probe result and the last known state.
    pub fn next(probe: bool, last: Option<ProviderHealth>) -> ProviderHealth {
        if !probe {
            return ProviderHealth::Dead;
        }
        match last {
            None | Some(ProviderHealth::Dead) => ProviderHealth::Recovering,
            Some(ProviderHealth::Recovering) | Some(ProviderHealth::Healthy) => {
                ProviderHealth::Healthy
            }
        }
    }

    pub fn is_healthy(self) -> bool {
        self == ProviderHealth::Healthy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderHealth::Dead => "dead",
            ProviderHealth::Recovering => "recovering",
            ProviderHealth::Healthy => "healthy",
        }
    }
}

impl fmt::Display for ProviderHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run a provider's liveness probe.
///
/// An error or a panic inside `check()` counts as a failed probe and is
/// never surfaced to the caller.
pub async fn probe(provider: &dyn Provider) -> bool {
    match AssertUnwindSafe(provider.check()).catch_unwind().await {
        Ok(Ok(healthy)) => healthy,
        Ok(Err(e)) => {
            tracing::warn!(provider = %provider.id(), error = %e, "Health probe failed");
            false
        }
        Err(_) => {
            tracing::warn!(provider = %provider.id(), "Health probe panicked");
            false
        }
    }
}

//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! caller → get()
//!     → outermost decorator (capacity limit and/or health check)
//!     → simple.rs (core balancer, owns the active id set)
//!     → Apply load balancing algorithm:
//!         - round_robin.rs (rotate through providers)
//!         - random.rs (pick a random provider)
//!     → provider.rs (invoke the selected provider)
//!     → Return its result or an error
//! ```
//!
//! # Design Decisions
//! - Every layer implements the same `LoadBalancer` contract, so decorators
//!   compose in any order
//! - A balancer is itself a `Provider` and can be nested in another balancer
//! - Algorithms own an atomically swapped snapshot of their provider list

use std::sync::Arc;

use async_trait::async_trait;

pub mod builder;
pub mod provider;
pub mod random;
pub mod round_robin;
pub mod simple;
pub mod types;

pub use builder::{build_from_config, BuiltBalancer, LoadBalancerExt};
pub use provider::{Provider, ProviderRef};
pub use random::Random;
pub use round_robin::RoundRobin;
pub use simple::SimpleLoadBalancer;
pub use types::{LoadBalancerError, Result};

/// Selection strategy over the active provider list.
pub trait Algorithm: Send + Sync {
    /// Pick the next provider, `None` when there is nothing to pick.
    fn select(&self) -> Option<ProviderRef>;

    /// Add a provider; no-op if the id is already present.
    fn add(&self, provider: ProviderRef);

    /// Remove a provider by id; no-op if absent.
    fn remove(&self, id: &str);

    /// Strategy name (for logging).
    fn name(&self) -> &'static str;
}

impl<A: Algorithm + ?Sized> Algorithm for Box<A> {
    fn select(&self) -> Option<ProviderRef> {
        (**self).select()
    }

    fn add(&self, provider: ProviderRef) {
        (**self).add(provider)
    }

    fn remove(&self, id: &str) {
        (**self).remove(id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A provider that dispatches to a mutable set of other providers.
///
/// `check()` on a balancer reports whether it currently has anything to
/// dispatch to.
#[async_trait]
pub trait LoadBalancer: Provider {
    /// Number of providers currently eligible for selection.
    fn provider_count(&self) -> usize;

    /// Register a provider. Idempotent on id.
    async fn add_provider(&self, provider: ProviderRef);

    /// Unregister a provider by id. Idempotent.
    async fn remove_provider(&self, id: &str);
}

#[async_trait]
impl<B: LoadBalancer + ?Sized> LoadBalancer for Arc<B> {
    fn provider_count(&self) -> usize {
        (**self).provider_count()
    }

    async fn add_provider(&self, provider: ProviderRef) {
        (**self).add_provider(provider).await
    }

    async fn remove_provider(&self, id: &str) {
        (**self).remove_provider(id).await
    }
}

#[async_trait]
impl<B: LoadBalancer + ?Sized> LoadBalancer for Box<B> {
    fn provider_count(&self) -> usize {
        (**self).provider_count()
    }

    async fn add_provider(&self, provider: ProviderRef) {
        (**self).add_provider(provider).await
    }

    async fn remove_provider(&self, id: &str) {
        (**self).remove_provider(id).await
    }
}

//! Capacity-limited balancer (admission control).
//!
//! # Responsibilities
//! - Bound concurrent `get()` calls to `limit x provider_count()`
//! - Reject excess requests immediately, never queue them
//!
//! # Design Decisions
//! - The bound follows the wrapped balancer's *current* provider count, so
//!   capacity tightens as providers become unavailable
//! - The in-flight slot is an RAII guard, released on every exit path
//!   including a dropped (cancelled) future

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::load_balancer::{
    provider::{Provider, ProviderRef},
    types::{LoadBalancerError, Result},
    LoadBalancer,
};
use crate::observability::metrics;

/// Decorator bounding concurrent requests per provider.
pub struct CapacityLimited<B> {
    inner: B,
    per_provider_limit: usize,
    in_flight: AtomicUsize,
}

impl<B: LoadBalancer> CapacityLimited<B> {
    /// Wrap `inner`, allowing `per_provider_limit` concurrent requests per
    /// visible provider. A limit of zero rejects everything.
    pub fn new(inner: B, per_provider_limit: usize) -> Self {
        Self {
            inner,
            per_provider_limit,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Requests currently holding a slot (admitted or being rejected).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Maximum concurrent requests at this instant.
    pub fn allowed(&self) -> usize {
        self.per_provider_limit
            .saturating_mul(self.inner.provider_count())
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

/// A RAII guard that holds one in-flight slot and keeps the gauge current.
struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
    balancer: &'a str,
    /// Counter value right after this guard's increment.
    active: usize,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(counter: &'a AtomicUsize, balancer: &'a str) -> Self {
        let active = counter.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_in_flight(balancer, active);
        Self {
            counter,
            balancer,
            active,
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let remaining = self.counter.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_in_flight(self.balancer, remaining);
    }
}

#[async_trait]
impl<B: LoadBalancer> Provider for CapacityLimited<B> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn get(&self) -> Result<String> {
        let slot = InFlightGuard::acquire(&self.in_flight, self.id());
        let allowed = self.allowed();

        if slot.active > allowed {
            tracing::warn!(
                balancer = %self.id(),
                active = slot.active,
                allowed,
                "Capacity exceeded, rejecting request"
            );
            metrics::record_capacity_rejection(self.id());
            return Err(LoadBalancerError::CapacityExceeded {
                active: slot.active,
                allowed,
            });
        }

        self.inner.get().await
    }

    async fn check(&self) -> Result<bool> {
        self.inner.check().await
    }
}

#[async_trait]
impl<B: LoadBalancer> LoadBalancer for CapacityLimited<B> {
    fn provider_count(&self) -> usize {
        self.inner.provider_count()
    }

    async fn add_provider(&self, provider: ProviderRef) {
        self.inner.add_provider(provider).await
    }

    async fn remove_provider(&self, id: &str) {
        self.inner.remove_provider(id).await
    }
}

//! Health-checked balancer.
//!
//! # Responsibilities
//! - Track a health state per registered provider
//! - Expose a provider on the wrapped balancer only once it is healthy
//! - Hide it again as soon as a probe fails
//!
//! # Design Decisions
//! - The tracked map is an `ArcSwap` snapshot; `inspect_all` iterates a
//!   snapshot and probes without holding any lock
//! - Each transition (map update plus the wrapped add/remove call) runs under
//!   one async mutex
//! - A probe result for an entry that was removed or replaced while probing
//!   is dropped; the next cycle picks up the new entry

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::health::state::{probe, ProviderHealth};
use crate::load_balancer::{
    provider::{Provider, ProviderRef},
    types::Result,
    LoadBalancer,
};
use crate::observability::metrics;

/// A provider together with its last known health.
#[derive(Clone)]
pub struct TrackedProvider {
    pub provider: ProviderRef,
    pub health: ProviderHealth,
}

type TrackedMap = HashMap<String, Arc<TrackedProvider>>;

/// Decorator that gates provider visibility on health probes.
pub struct HealthChecked<B> {
    inner: B,
    tracked: ArcSwap<TrackedMap>,
    transitions: Mutex<()>,
}

impl<B: LoadBalancer> HealthChecked<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            tracked: ArcSwap::default(),
            transitions: Mutex::new(()),
        }
    }

    /// Probe every tracked provider once and apply the resulting transitions.
    ///
    /// Returns the number of providers whose state changed.
    pub async fn inspect_all(&self) -> usize {
        let snapshot = self.tracked.load_full();
        tracing::debug!(
            balancer = %self.inner.id(),
            tracked = snapshot.len(),
            "Inspecting providers"
        );

        let mut changed = 0;
        for entry in snapshot.values() {
            if self.inspect(entry.provider.clone(), Some(entry)).await {
                changed += 1;
            }
        }
        changed
    }

    /// Last known health of a tracked provider.
    pub fn health_of(&self, id: &str) -> Option<ProviderHealth> {
        self.tracked.load().get(id).map(|entry| entry.health)
    }

    /// All tracked providers with their health, sorted by id.
    pub fn snapshot(&self) -> Vec<(String, ProviderHealth)> {
        let mut entries: Vec<_> = self
            .tracked
            .load()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.health))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.load().len()
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Probe one provider and apply its transition.
    ///
    /// `previous` is the snapshot entry the probe was based on, `None` for a
    /// newly added provider.
    async fn inspect(
        &self,
        provider: ProviderRef,
        previous: Option<&Arc<TrackedProvider>>,
    ) -> bool {
        let last = previous.map(|entry| entry.health);
        let next = ProviderHealth::next(probe(provider.as_ref()).await, last);
        if Some(next) == last {
            return false;
        }

        let _transition = self.transitions.lock().await;
        let id = provider.id().to_string();
        let current = self.tracked.load_full();

        if let Some(previous) = previous {
            match current.get(&id) {
                Some(entry) if Arc::ptr_eq(entry, previous) => {}
                _ => {
                    tracing::debug!(provider = %id, "Entry changed while probing, dropping result");
                    return false;
                }
            }
        }

        let mut updated = TrackedMap::clone(&current);
        updated.insert(
            id.clone(),
            Arc::new(TrackedProvider {
                provider: provider.clone(),
                health: next,
            }),
        );
        self.tracked.store(Arc::new(updated));

        match last {
            Some(last) => {
                tracing::info!(provider = %id, from = %last, to = %next, "Provider health changed")
            }
            None => tracing::info!(provider = %id, to = %next, "Provider registered"),
        }
        metrics::record_health_transition(&id, next);

        if next.is_healthy() {
            self.inner.add_provider(provider).await;
        } else {
            self.inner.remove_provider(&id).await;
        }
        true
    }
}

#[async_trait]
impl<B: LoadBalancer> Provider for HealthChecked<B> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn get(&self) -> Result<String> {
        self.inner.get().await
    }

    async fn check(&self) -> Result<bool> {
        self.inner.check().await
    }
}

#[async_trait]
impl<B: LoadBalancer> LoadBalancer for HealthChecked<B> {
    fn provider_count(&self) -> usize {
        self.inner.provider_count()
    }

    /// Start tracking `provider` and run its first probe. The provider only
    /// reaches the wrapped balancer once it is healthy.
    async fn add_provider(&self, provider: ProviderRef) {
        self.inspect(provider, None).await;
    }

    async fn remove_provider(&self, id: &str) {
        let _transition = self.transitions.lock().await;
        let current = self.tracked.load_full();
        if current.contains_key(id) {
            let mut updated = TrackedMap::clone(&current);
            updated.remove(id);
            self.tracked.store(Arc::new(updated));
            tracing::info!(provider = %id, "Provider unregistered");
            metrics::clear_provider_health(id);
        }
        self.inner.remove_provider(id).await;
    }
}

//! Core balancer.
//!
//! # Responsibilities
//! - Own the canonical set of active provider ids
//! - Mirror membership changes into the selection algorithm
//! - Dispatch `get()` to whatever the algorithm selects

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::load_balancer::{
    provider::{Provider, ProviderRef},
    types::{LoadBalancerError, Result},
    Algorithm, LoadBalancer,
};
use crate::observability::metrics;

/// Balancer that delegates selection to an [`Algorithm`].
pub struct SimpleLoadBalancer<A> {
    id: String,
    algorithm: A,
    /// Active ids, published as a snapshot for lock-free reads.
    active: ArcSwap<HashSet<String>>,
    /// Serializes membership changes so the id set and the algorithm agree.
    membership: Mutex<()>,
}

impl<A: Algorithm> SimpleLoadBalancer<A> {
    pub fn new(id: impl Into<String>, algorithm: A) -> Self {
        Self {
            id: id.into(),
            algorithm,
            active: ArcSwap::default(),
            membership: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<A: Algorithm> Provider for SimpleLoadBalancer<A> {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self) -> Result<String> {
        let Some(provider) = self.algorithm.select() else {
            tracing::debug!(
                balancer = %self.id,
                algorithm = self.algorithm.name(),
                "No provider selected"
            );
            metrics::record_request(&self.id, "no_providers");
            return Err(LoadBalancerError::NoProviders {
                balancer: self.id.clone(),
            });
        };

        tracing::trace!(balancer = %self.id, provider = %provider.id(), "Provider selected");
        let result = provider.get().await;
        match &result {
            Ok(_) => metrics::record_request(&self.id, "ok"),
            Err(e) => metrics::record_request(&self.id, e.kind()),
        }
        result
    }

    async fn check(&self) -> Result<bool> {
        Ok(self.provider_count() > 0)
    }
}

#[async_trait]
impl<A: Algorithm> LoadBalancer for SimpleLoadBalancer<A> {
    fn provider_count(&self) -> usize {
        self.active.load().len()
    }

    async fn add_provider(&self, provider: ProviderRef) {
        let _membership = self.membership.lock().unwrap_or_else(PoisonError::into_inner);
        let id = provider.id().to_string();
        if !self.active.load().contains(&id) {
            let mut next = HashSet::clone(&self.active.load());
            next.insert(id.clone());
            self.active.store(Arc::new(next));
            tracing::debug!(balancer = %self.id, provider = %id, "Provider activated");
        }
        self.algorithm.add(provider);
    }

    async fn remove_provider(&self, id: &str) {
        let _membership = self.membership.lock().unwrap_or_else(PoisonError::into_inner);
        if self.active.load().contains(id) {
            let mut next = HashSet::clone(&self.active.load());
            next.remove(id);
            self.active.store(Arc::new(next));
            tracing::debug!(balancer = %self.id, provider = %id, "Provider deactivated");
        }
        self.algorithm.remove(id);
    }
}

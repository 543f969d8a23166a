//! Random load balancing strategy.

use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::Rng;

use crate::load_balancer::{provider::ProviderRef, Algorithm};

/// Source of indices in `[0, bound)`.
pub type IndexSource = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Random selector.
/// Picks uniformly from the current snapshot using a pluggable index source.
pub struct Random {
    providers: ArcSwap<Vec<ProviderRef>>,
    next_index: IndexSource,
}

impl Random {
    /// Random selection backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_source(|bound| rand::thread_rng().gen_range(0..bound))
    }

    /// Random selection with an injected index source (deterministic tests).
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn(usize) -> usize + Send + Sync + 'static,
    {
        Self {
            providers: ArcSwap::default(),
            next_index: Box::new(source),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Random {
    fn select(&self) -> Option<ProviderRef> {
        let snapshot = self.providers.load();
        if snapshot.is_empty() {
            return None;
        }

        let index = (self.next_index)(snapshot.len());
        let picked = snapshot.get(index).cloned();
        if picked.is_none() {
            tracing::debug!(
                index,
                size = snapshot.len(),
                "Index source returned out-of-range index"
            );
        }
        picked
    }

    fn add(&self, provider: ProviderRef) {
        self.providers.rcu(|current| {
            if current.iter().any(|p| p.id() == provider.id()) {
                Arc::clone(current)
            } else {
                let mut next = Vec::clone(current);
                next.push(provider.clone());
                Arc::new(next)
            }
        });
    }

    fn remove(&self, id: &str) {
        self.providers.rcu(|current| {
            current
                .iter()
                .filter(|p| p.id() != id)
                .cloned()
                .collect::<Vec<_>>()
        });
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

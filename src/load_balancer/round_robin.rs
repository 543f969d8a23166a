//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::load_balancer::{provider::ProviderRef, Algorithm};

/// Round-robin selector.
/// Stores an internal counter to rotate through the provider snapshot.
#[derive(Default)]
pub struct RoundRobin {
    providers: ArcSwap<Vec<ProviderRef>>,
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Algorithm for RoundRobin {
    fn select(&self) -> Option<ProviderRef> {
        let snapshot = self.providers.load();
        if snapshot.is_empty() {
            return None;
        }

        // The counter is never reset; it only wraps against the current size.
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % snapshot.len();
        Some(snapshot[index].clone())
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
        "round_robin"
    }
}

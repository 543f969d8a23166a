//! Shared utilities for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use provider_balancer::load_balancer::{LoadBalancer, Provider, ProviderRef, Result};

/// Provider whose probes follow a script; the last answer repeats forever.
pub struct ScriptedProvider {
    id: String,
    probes: Mutex<VecDeque<bool>>,
}

impl ScriptedProvider {
    pub fn new(id: &str, probes: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            probes: Mutex::new(probes.iter().copied().collect()),
        })
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn check(&self) -> Result<bool> {
        let mut probes = self.probes.lock().unwrap();
        let next = if probes.len() > 1 {
            probes.pop_front().unwrap()
        } else {
            *probes.front().unwrap_or(&false)
        };
        Ok(next)
    }
}

/// Healthy provider whose `get()` parks until the test releases it.
#[allow(dead_code)]
pub struct GatedProvider {
    id: String,
    entered: AtomicUsize,
    release: Semaphore,
}

#[allow(dead_code)]
impl GatedProvider {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            entered: AtomicUsize::new(0),
            release: Semaphore::new(0),
        })
    }

    /// Number of `get()` calls that reached this provider.
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    /// Let `n` parked calls complete.
    pub fn release(&self, n: usize) {
        self.release.add_permits(n);
    }
}

#[async_trait]
impl Provider for GatedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self) -> Result<String> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let permit = self.release.acquire().await.expect("semaphore closed");
        permit.forget();
        Ok(self.id.clone())
    }

    async fn check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Membership call observed by [`RecordingBalancer`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(String),
    Remove(String),
}

/// Balancer that records membership calls and dispatches nothing.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingBalancer {
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl RecordingBalancer {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn adds(&self, id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::Add(id.to_string()))
            .count()
    }

    pub fn removes(&self, id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::Remove(id.to_string()))
            .count()
    }
}

#[async_trait]
impl Provider for RecordingBalancer {
    fn id(&self) -> &str {
        "recording"
    }

    async fn check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl LoadBalancer for RecordingBalancer {
    fn provider_count(&self) -> usize {
        0
    }

    async fn add_provider(&self, provider: ProviderRef) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Add(provider.id().to_string()));
    }

    async fn remove_provider(&self, id: &str) {
        self.calls.lock().unwrap().push(Call::Remove(id.to_string()));
    }
}

/// Poll `condition` until it holds, failing the test after ~2s.
#[allow(dead_code)]
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

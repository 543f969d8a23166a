//! Fake providers used by the demo binary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use provider_balancer::load_balancer::{Provider, ProviderRef, Result};

const SIMULATED_LATENCY: Duration = Duration::from_secs(2);

/// Always passes its probe; answers after a fixed delay.
struct SteadyProvider {
    id: String,
}

#[async_trait]
impl Provider for SteadyProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self) -> Result<String> {
        tokio::time::sleep(SIMULATED_LATENCY).await;
        Ok(self.id.clone())
    }

    async fn check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Never passes its probe.
struct DownProvider;

#[async_trait]
impl Provider for DownProvider {
    fn id(&self) -> &str {
        "UnHealthy"
    }

    async fn check(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Passes roughly two probes out of three.
struct FlakyProvider;

#[async_trait]
impl Provider for FlakyProvider {
    fn id(&self) -> &str {
        "Dangling"
    }

    async fn get(&self) -> Result<String> {
        tokio::time::sleep(SIMULATED_LATENCY).await;
        Ok(self.id().to_string())
    }

    async fn check(&self) -> Result<bool> {
        Ok(rand::thread_rng().gen_range(0..3) > 0)
    }
}

pub fn providers() -> Vec<ProviderRef> {
    vec![
        Arc::new(SteadyProvider { id: "Healthy1".into() }),
        Arc::new(SteadyProvider { id: "Healthy2".into() }),
        Arc::new(DownProvider),
        Arc::new(FlakyProvider),
    ]
}

//! Balancer stack assembly.
//!
//! Two ways to build a stack:
//! - fluently, via [`LoadBalancerExt`] on any balancer
//!   (`SimpleLoadBalancer::new(..).with_capacity_limit(2).with_health_check()`)
//! - from a [`BalancerConfig`], which layers decorators in configured order

use std::sync::Arc;

use crate::config::{AlgorithmKind, BalancerConfig, HealthCheckConfig, LayerConfig};
use crate::health::{HealthChecked, HealthMonitor};
use crate::load_balancer::{Algorithm, LoadBalancer, Random, RoundRobin, SimpleLoadBalancer};
use crate::resilience::CapacityLimited;

/// Decorator combinators available on every balancer.
pub trait LoadBalancerExt: LoadBalancer + Sized {
    /// Bound concurrent requests to `per_provider_limit` per visible provider.
    fn with_capacity_limit(self, per_provider_limit: usize) -> CapacityLimited<Self> {
        CapacityLimited::new(self, per_provider_limit)
    }

    /// Only expose providers that pass health probes.
    fn with_health_check(self) -> HealthChecked<Self> {
        HealthChecked::new(self)
    }
}

impl<B: LoadBalancer> LoadBalancerExt for B {}

/// Type-erased balancer handle.
pub type DynLoadBalancer = Arc<dyn LoadBalancer>;

/// A stack assembled from configuration.
pub struct BuiltBalancer {
    /// Outermost layer; requests and membership changes go here.
    pub balancer: DynLoadBalancer,
    /// The health-check layer, if configured, for scheduling inspections.
    pub health: Option<Arc<HealthChecked<DynLoadBalancer>>>,
}

impl BuiltBalancer {
    /// Monitor driving the health layer, if there is one.
    pub fn health_monitor(
        &self,
        config: HealthCheckConfig,
    ) -> Option<HealthMonitor<DynLoadBalancer>> {
        self.health
            .as_ref()
            .map(|health| HealthMonitor::new(health.clone(), config))
    }
}

fn algorithm(kind: AlgorithmKind) -> Box<dyn Algorithm> {
    match kind {
        AlgorithmKind::RoundRobin => Box::new(RoundRobin::new()),
        AlgorithmKind::Random => Box::new(Random::new()),
    }
}

/// Assemble the configured stack. Expects a validated config.
pub fn build_from_config(config: &BalancerConfig) -> BuiltBalancer {
    let core = SimpleLoadBalancer::new(config.id.clone(), algorithm(config.algorithm));
    let mut balancer: DynLoadBalancer = Arc::new(core);
    let mut health = None;

    for layer in &config.layers {
        match layer {
            LayerConfig::CapacityLimit { per_provider_limit } => {
                balancer = Arc::new(CapacityLimited::new(balancer, *per_provider_limit));
            }
            LayerConfig::HealthCheck => {
                let checked = Arc::new(HealthChecked::new(balancer));
                health = Some(checked.clone());
                balancer = checked;
            }
        }
    }

    tracing::info!(
        id = %config.id,
        algorithm = ?config.algorithm,
        layers = config.layers.len(),
        health_checked = health.is_some(),
        "Balancer assembled"
    );

    BuiltBalancer { balancer, health }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::provider::Provider;
    use crate::load_balancer::types::{LoadBalancerError, Result};
    use async_trait::async_trait;

    struct Up(&'static str);

    #[async_trait]
    impl Provider for Up {
        fn id(&self) -> &str {
            self.0
        }

        async fn check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_fluent_stack() {
        let lb = SimpleLoadBalancer::new("LB1", RoundRobin::new())
            .with_capacity_limit(2)
            .with_health_check();

        lb.add_provider(Arc::new(Up("Healthy1"))).await;
        assert!(matches!(lb.get().await, Err(LoadBalancerError::CapacityExceeded { .. })));

        lb.inspect_all().await;
        assert_eq!(lb.get().await.unwrap(), "Healthy1");
        assert_eq!(lb.id(), "LB1");
    }

    #[tokio::test]
    async fn test_build_default_config() {
        let built = build_from_config(&BalancerConfig::default());
        let health = built.health.clone().expect("health layer configured");

        built.balancer.add_provider(Arc::new(Up("p1"))).await;
        assert_eq!(built.balancer.provider_count(), 0);

        health.inspect_all().await;
        assert_eq!(built.balancer.provider_count(), 1);
        assert_eq!(built.balancer.get().await.unwrap(), "p1");
    }

    #[tokio::test]
    async fn test_build_without_layers() {
        let config = BalancerConfig {
            algorithm: AlgorithmKind::Random,
            layers: Vec::new(),
            ..BalancerConfig::default()
        };
        let built = build_from_config(&config);
        assert!(built.health.is_none());
        assert!(built.health_monitor(HealthCheckConfig::default()).is_none());

        built.balancer.add_provider(Arc::new(Up("p1"))).await;
        assert_eq!(built.balancer.get().await.unwrap(), "p1");
    }
}

//! Active health checking.
//!
//! # Responsibilities
//! - Periodically trigger inspection of every tracked provider
//! - Stop cleanly when shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::tracker::HealthChecked;
use crate::load_balancer::LoadBalancer;

pub struct HealthMonitor<B> {
    balancer: Arc<HealthChecked<B>>,
    config: HealthCheckConfig,
}

impl<B: LoadBalancer> HealthMonitor<B> {
    pub fn new(balancer: Arc<HealthChecked<B>>, config: HealthCheckConfig) -> Self {
        Self { balancer, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Active health checks disabled");
            return;
        }

        tracing::info!(
            initial_delay_ms = self.config.initial_delay_ms,
            interval_ms = self.config.interval_ms,
            "Health monitor starting"
        );

        let interval = Duration::from_millis(self.config.interval_ms);
        let mut delay = Duration::from_millis(self.config.initial_delay_ms);

        loop {
            // The delay counts from the end of the previous cycle.
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }

            let changed = self.balancer.inspect_all().await;
            tracing::debug!(
                changed,
                visible = self.balancer.provider_count(),
                "Health check cycle complete"
            );
            delay = interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::state::ProviderHealth;
    use crate::lifecycle::Shutdown;
    use crate::load_balancer::provider::Provider;
    use crate::load_balancer::types::Result;
    use crate::load_balancer::{RoundRobin, SimpleLoadBalancer};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct AlwaysUp;

    #[async_trait]
    impl Provider for AlwaysUp {
        fn id(&self) -> &str {
            "up"
        }

        async fn check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_monitor_promotes_and_stops() {
        let balancer = Arc::new(HealthChecked::new(SimpleLoadBalancer::new(
            "LB1",
            RoundRobin::new(),
        )));
        balancer.add_provider(Arc::new(AlwaysUp)).await;

        let config = HealthCheckConfig {
            enabled: true,
            initial_delay_ms: 0,
            interval_ms: 10,
        };
        let shutdown = Shutdown::new();
        let monitor = HealthMonitor::new(balancer.clone(), config);
        let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

        for _ in 0..100 {
            if balancer.health_of("up") == Some(ProviderHealth::Healthy) {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(balancer.provider_count(), 1);

        shutdown.trigger();
        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }

    /// Provider whose check takes a while and records when each one started.
    struct Slow {
        started: Mutex<Vec<Instant>>,
    }

    #[async_trait]
    impl Provider for Slow {
        fn id(&self) -> &str {
            "slow"
        }

        async fn check(&self) -> Result<bool> {
            self.started.lock().unwrap().push(Instant::now());
            time::sleep(Duration::from_millis(80)).await;
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_interval_counts_from_end_of_cycle() {
        let balancer = Arc::new(HealthChecked::new(SimpleLoadBalancer::new(
            "LB1",
            RoundRobin::new(),
        )));
        let slow = Arc::new(Slow {
            started: Mutex::new(Vec::new()),
        });
        balancer.add_provider(slow.clone()).await;
        slow.started.lock().unwrap().clear();

        let config = HealthCheckConfig {
            enabled: true,
            initial_delay_ms: 0,
            interval_ms: 100,
        };
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(HealthMonitor::new(balancer, config).run(shutdown.subscribe()));

        for _ in 0..200 {
            if slow.started.lock().unwrap().len() >= 4 {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        shutdown.trigger();
        handle.await.unwrap();

        let started = slow.started.lock().unwrap().clone();
        assert!(started.len() >= 4);
        for pair in started.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(175), "gap was {gap:?}");
        }
    }

    #[tokio::test]
    async fn test_disabled_monitor_returns_immediately() {
        let balancer = Arc::new(HealthChecked::new(SimpleLoadBalancer::new(
            "LB1",
            RoundRobin::new(),
        )));
        let config = HealthCheckConfig {
            enabled: false,
            ..HealthCheckConfig::default()
        };
        let shutdown = Shutdown::new();
        HealthMonitor::new(balancer, config)
            .run(shutdown.subscribe())
            .await;
    }
}

//! Composable client-side load balancer.
//!
//! A stack is a core balancer (round robin or random selection) wrapped in
//! any number of decorators sharing the same [`LoadBalancer`] contract:
//! capacity limiting and health checking.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;

pub use config::schema::BalancerConfig;
pub use health::{HealthChecked, HealthMonitor, ProviderHealth};
pub use lifecycle::Shutdown;
pub use load_balancer::{
    build_from_config, LoadBalancer, LoadBalancerError, LoadBalancerExt, Provider, ProviderRef,
    Random, RoundRobin, SimpleLoadBalancer,
};
pub use resilience::CapacityLimited;

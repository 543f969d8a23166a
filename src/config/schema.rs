//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a balancer
//! stack. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a balancer stack.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Balancer identifier for logging/metrics.
    pub id: String,

    /// Selection strategy of the core balancer.
    pub algorithm: AlgorithmKind,

    /// Decorators applied around the core balancer, innermost first.
    pub layers: Vec<LayerConfig>,

    /// Health check scheduling.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            id: "LB1".to_string(),
            algorithm: AlgorithmKind::RoundRobin,
            layers: vec![
                LayerConfig::CapacityLimit {
                    per_provider_limit: default_per_provider_limit(),
                },
                LayerConfig::HealthCheck,
            ],
            health_check: HealthCheckConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Provider selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    #[default]
    RoundRobin,
    Random,
}

/// A decorator wrapped around the balancer below it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerConfig {
    /// Bound concurrent requests to `per_provider_limit` per visible provider.
    CapacityLimit {
        #[serde(default = "default_per_provider_limit")]
        per_provider_limit: usize,
    },
    /// Only expose providers that pass health probes.
    HealthCheck,
}

fn default_per_provider_limit() -> usize {
    2
}

/// Health check scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Run the periodic health monitor.
    pub enabled: bool,

    /// Delay before the first inspection in milliseconds.
    pub initial_delay_ms: u64,

    /// Delay between inspections in milliseconds.
    pub interval_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 2_000,
            interval_ms: 5_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

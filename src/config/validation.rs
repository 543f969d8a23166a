//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, intervals > 0)
//! - Detect conflicting layer stacks
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{BalancerConfig, LayerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("balancer id must not be empty")]
    EmptyId,

    #[error("layer {index}: per_provider_limit must be greater than 0")]
    ZeroCapacityLimit { index: usize },

    #[error("layer {index}: health_check may only appear once")]
    DuplicateHealthCheck { index: usize },

    #[error("health_check.interval_ms must be greater than 0")]
    ZeroHealthInterval,

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.id.trim().is_empty() {
        errors.push(ValidationError::EmptyId);
    }

    let mut seen_health_check = false;
    for (index, layer) in config.layers.iter().enumerate() {
        match layer {
            LayerConfig::CapacityLimit { per_provider_limit } if *per_provider_limit == 0 => {
                errors.push(ValidationError::ZeroCapacityLimit { index });
            }
            LayerConfig::CapacityLimit { .. } => {}
            LayerConfig::HealthCheck if seen_health_check => {
                errors.push(ValidationError::DuplicateHealthCheck { index });
            }
            LayerConfig::HealthCheck => seen_health_check = true,
        }
    }

    if config.health_check.enabled && config.health_check.interval_ms == 0 {
        errors.push(ValidationError::ZeroHealthInterval);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Error definitions shared by providers and balancers.

use thiserror::Error;

/// Errors surfaced by `get()` anywhere in a balancer stack.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadBalancerError {
    /// The balancer had nothing to select from.
    #[error("no service provider available in balancer '{balancer}'")]
    NoProviders { balancer: String },

    /// Admission control rejected the request.
    #[error("can't handle {active} request(s) at once, max allowed: {allowed}")]
    CapacityExceeded { active: usize, allowed: usize },

    /// A provider's own operation failed.
    #[error("provider '{id}' failed: {message}")]
    Provider { id: String, message: String },
}

impl LoadBalancerError {
    /// Convenience constructor for provider implementations.
    pub fn provider(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoProviders { .. } => "no_providers",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Provider { .. } => "provider_error",
        }
    }
}

/// Result alias for balancer operations.
pub type Result<T> = std::result::Result<T, LoadBalancerError>;

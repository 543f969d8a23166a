//! Provider abstraction.
//!
//! # Responsibilities
//! - Represent a single unit of work a balancer can dispatch to
//! - Expose an identity, a request operation and a liveness probe
//!
//! A provider is an opaque capability; whatever transport sits behind
//! `get()` is the implementor's business.

use std::sync::Arc;

use async_trait::async_trait;

use crate::load_balancer::types::Result;

/// A unit of work dispatch targets.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Identity, non-empty and unique within an active set.
    fn id(&self) -> &str;

    /// Serve one request.
    async fn get(&self) -> Result<String> {
        Ok(self.id().to_string())
    }

    /// Liveness probe. Errors are treated as a failed probe by health tracking.
    async fn check(&self) -> Result<bool>;
}

/// Shared handle to a type-erased provider.
pub type ProviderRef = Arc<dyn Provider>;

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn id(&self) -> &str {
        (**self).id()
    }

    async fn get(&self) -> Result<String> {
        (**self).get().await
    }

    async fn check(&self) -> Result<bool> {
        (**self).check().await
    }
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    fn id(&self) -> &str {
        (**self).id()
    }

    async fn get(&self) -> Result<String> {
        (**self).get().await
    }

    async fn check(&self) -> Result<bool> {
        (**self).check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Provider for Named {
        fn id(&self) -> &str {
            self.0
        }

        async fn check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_default_get_returns_id() {
        let p: ProviderRef = Arc::new(Named("p1"));
        assert_eq!(p.get().await.unwrap(), "p1");
        assert!(p.check().await.unwrap());
    }
}

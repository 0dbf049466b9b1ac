//! Readiness probe for the cache store.

use super::CacheInterface;
use async_trait::async_trait;
use carelink_core::{HealthCheck, HealthStatus};
use carelink_resilience::with_timeout;
use std::sync::Arc;
use std::time::Duration;

const PROBE_KEY: &str = "health:probe";

/// Reports the cache store as degraded, never unhealthy: every cache read
/// already falls back to the relational store.
pub struct CacheHealth {
    cache: Arc<dyn CacheInterface>,
    timeout: Duration,
}

impl CacheHealth {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }
}

#[async_trait]
impl HealthCheck for CacheHealth {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }

        match with_timeout(self.timeout, || self.cache.get_raw(PROBE_KEY)).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

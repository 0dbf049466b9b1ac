//! In-process cache with per-entry expiry.

use super::CacheInterface;
use async_trait::async_trait;
use carelink_core::CarelinkResult;
use dashmap::DashMap;
use shaku::Component;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cache backed by a concurrent map, for single-process runs and tests.
///
/// Expired entries are dropped lazily on read.
#[derive(Component, Default)]
#[shaku(interface = CacheInterface)]
pub struct InMemoryCache {
    #[shaku(default)]
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remaining lifetime of a live entry.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .and_then(|entry| entry.1.checked_duration_since(Instant::now()))
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> CarelinkResult<Option<String>> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.1 > now => Some(entry.0.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if value.is_none() {
            debug!("Evicting expired key '{}'", key);
            self.entries.remove_if(key, |_, (_, expires)| *expires <= now);
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CarelinkResult<()> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CarelinkResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

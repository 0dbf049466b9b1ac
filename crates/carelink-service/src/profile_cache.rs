//! Authorization profile cache.
//!
//! Read-through cache of the `profiles` row projection the request gate
//! needs. Entries live under `profile:{id}` and are deleted by every action
//! that mutates the row. Nothing here ever returns an error: an unavailable
//! cache is a miss and an unavailable store is "no profile".

use crate::background::BackgroundTasks;
use crate::cache::{cache_keys, CacheExt, CacheInterface};
use async_trait::async_trait;
use carelink_config::CacheConfig;
use carelink_core::{CachedProfile, Interface, ProfileId};
use carelink_repository::ProfileRepository;
use carelink_resilience::with_timeout;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-identity authorization lookups.
#[async_trait]
pub trait ProfileCache: Interface + Send + Sync {
    /// Role, approval status and hospital link for an identity.
    ///
    /// `None` when no row exists or the store could not be read.
    async fn get_authorized_profile(&self, id: &ProfileId) -> Option<CachedProfile>;

    /// Drops the cached entry. Failures are logged, never raised.
    async fn invalidate_profile(&self, id: &ProfileId);
}

/// Profile cache over a key-value store and the `profiles` table.
#[derive(Component)]
#[shaku(interface = ProfileCache)]
pub struct ProfileCacheComponent {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(inject)]
    profiles: Arc<dyn ProfileRepository>,
    #[shaku(inject)]
    tasks: Arc<dyn BackgroundTasks>,
    settings: CacheConfig,
}

impl ProfileCacheComponent {
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheInterface>,
        profiles: Arc<dyn ProfileRepository>,
        tasks: Arc<dyn BackgroundTasks>,
        settings: CacheConfig,
    ) -> Self {
        Self {
            cache,
            profiles,
            tasks,
            settings,
        }
    }

    async fn read_cached(&self, key: &str) -> Option<CachedProfile> {
        let read = with_timeout(self.settings.profile_read_timeout(), || {
            self.cache.get::<CachedProfile>(key)
        })
        .await;

        match read {
            Ok(Some(profile)) if profile.is_incompletely_provisioned() => {
                debug!("Ignoring cached incompletely provisioned profile at '{}'", key);
                None
            }
            Ok(Some(profile)) => {
                debug!("Profile cache hit for '{}'", key);
                Some(profile)
            }
            Ok(None) => {
                debug!("Profile cache miss for '{}'", key);
                None
            }
            Err(e) => {
                warn!("Profile cache read for '{}' treated as miss: {}", key, e);
                None
            }
        }
    }

    fn write_behind(&self, key: String, profile: CachedProfile) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.settings.profile_ttl();
        let write_key = key.clone();
        self.tasks.spawn_write(
            key,
            Box::pin(async move { cache.set(&write_key, &profile, ttl).await }),
        );
    }
}

#[async_trait]
impl ProfileCache for ProfileCacheComponent {
    async fn get_authorized_profile(&self, id: &ProfileId) -> Option<CachedProfile> {
        let key = cache_keys::profile(id);

        if let Some(profile) = self.read_cached(&key).await {
            return Some(profile);
        }

        let profile = match self.profiles.find_by_id(id).await {
            Ok(Some(row)) => row.to_cached(),
            Ok(None) => {
                debug!("No profile row for {}", id);
                return None;
            }
            Err(e) => {
                warn!("Profile lookup for {} failed: {}", id, e);
                return None;
            }
        };

        if profile.is_incompletely_provisioned() {
            debug!("Profile {} is an admin without a hospital; not caching", id);
        } else {
            self.write_behind(key, profile.clone());
        }

        Some(profile)
    }

    async fn invalidate_profile(&self, id: &ProfileId) {
        let key = cache_keys::profile(id);

        match with_timeout(self.settings.profile_read_timeout(), || self.cache.delete(&key)).await
        {
            Ok(existed) => debug!("Invalidated '{}' (present: {})", key, existed),
            Err(e) => warn!("Failed to invalidate '{}': {}", key, e),
        }
    }
}

impl std::fmt::Debug for ProfileCacheComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCacheComponent")
            .field("ttl", &self.settings.profile_ttl())
            .field("read_timeout", &self.settings.profile_read_timeout())
            .finish_non_exhaustive()
    }
}

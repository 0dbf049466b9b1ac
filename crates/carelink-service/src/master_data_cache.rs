//! Master-data cache.
//!
//! Locations, services and specialties are read on most page renders and
//! change rarely. Each list is cached whole under `{version}:{list}`; any
//! master-data mutation drops all three keys. Reads never fail: a slow or
//! broken cache is a miss, a broken store is retried and finally yields an
//! empty list.

use crate::background::BackgroundTasks;
use crate::cache::{cache_keys, CacheExt, CacheInterface};
use async_trait::async_trait;
use carelink_config::CacheConfig;
use carelink_core::{
    CarelinkResult, Interface, Location, MasterList, MasterRecord, Service, Specialty,
};
use carelink_repository::MasterDataRepository;
use carelink_resilience::{with_deadline, with_timeout, RetryPolicy};
use futures::future::join_all;
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Cached master lists.
#[async_trait]
pub trait MasterDataCache: Interface + Send + Sync {
    async fn get_cached_locations(&self) -> Vec<Location>;

    async fn get_cached_services(&self) -> Vec<Service>;

    async fn get_cached_specialties(&self) -> Vec<Specialty>;

    /// Drops one cached list.
    async fn invalidate_list(&self, kind: MasterList);

    async fn invalidate_locations(&self) {
        self.invalidate_list(MasterList::Locations).await;
    }

    async fn invalidate_services(&self) {
        self.invalidate_list(MasterList::Services).await;
    }

    async fn invalidate_specialties(&self) {
        self.invalidate_list(MasterList::Specialties).await;
    }

    /// Drops all three lists concurrently. Each failure is logged on its own.
    async fn invalidate_all(&self) {
        join_all(MasterList::all().map(|kind| self.invalidate_list(kind))).await;
    }
}

/// Master-data cache over a key-value store and the master tables.
#[derive(Component)]
#[shaku(interface = MasterDataCache)]
pub struct MasterDataCacheComponent {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(inject)]
    master_data: Arc<dyn MasterDataRepository>,
    #[shaku(inject)]
    tasks: Arc<dyn BackgroundTasks>,
    settings: CacheConfig,
}

impl MasterDataCacheComponent {
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheInterface>,
        master_data: Arc<dyn MasterDataRepository>,
        tasks: Arc<dyn BackgroundTasks>,
        settings: CacheConfig,
    ) -> Self {
        Self {
            cache,
            master_data,
            tasks,
            settings,
        }
    }

    fn key(&self, kind: MasterList) -> String {
        cache_keys::master_list(&self.settings.master_data_key_version, kind)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.settings.master_data_fetch_attempts,
            self.settings.master_data_retry_base_delay(),
        )
    }

    /// Read-through lookup of the list `T` belongs to.
    ///
    /// `fetch` loads the complete ordered list from the store.
    pub async fn get_cached_list<T, F, Fut>(&self, fetch: F) -> Vec<T>
    where
        T: MasterRecord,
        F: Fn() -> Fut,
        Fut: Future<Output = CarelinkResult<Vec<T>>>,
    {
        let kind = T::KIND;
        let key = self.key(kind);
        let shutdown = self.tasks.shutdown_token();

        match with_deadline(
            self.settings.master_data_read_timeout(),
            &shutdown,
            self.cache.get::<Vec<T>>(&key),
        )
        .await
        {
            Ok(Some(list)) if !list.is_empty() => {
                debug!("Master-data cache hit for '{}' ({} rows)", key, list.len());
                return list;
            }
            Ok(_) => debug!("Master-data cache miss for '{}'", key),
            Err(e) => warn!("Master-data cache read for '{}' treated as miss: {}", key, e),
        }

        let rows = match self.retry_policy().execute(&fetch).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Fetching {} failed after retries: {}; trying once more", kind, e);
                match fetch().await {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!("Fetching {} failed: {}; serving an empty list", kind, e);
                        return Vec::new();
                    }
                }
            }
        };

        if rows.is_empty() {
            debug!("Not caching empty {} list", kind);
        } else {
            self.write_behind(key, rows.clone());
        }

        rows
    }

    fn write_behind<T: MasterRecord>(&self, key: String, rows: Vec<T>) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.settings.master_data_ttl();
        let write_key = key.clone();
        self.tasks.spawn_write(
            key,
            Box::pin(async move { cache.set(&write_key, &rows, ttl).await }),
        );
    }
}

#[async_trait]
impl MasterDataCache for MasterDataCacheComponent {
    async fn get_cached_locations(&self) -> Vec<Location> {
        self.get_cached_list(|| self.master_data.list_locations()).await
    }

    async fn get_cached_services(&self) -> Vec<Service> {
        self.get_cached_list(|| self.master_data.list_services()).await
    }

    async fn get_cached_specialties(&self) -> Vec<Specialty> {
        self.get_cached_list(|| self.master_data.list_specialties()).await
    }

    async fn invalidate_list(&self, kind: MasterList) {
        let key = self.key(kind);

        match with_timeout(self.settings.master_data_read_timeout(), || {
            self.cache.delete(&key)
        })
        .await
        {
            Ok(existed) => debug!("Invalidated '{}' (present: {})", key, existed),
            Err(e) => warn!("Failed to invalidate '{}': {}", key, e),
        }
    }
}

impl std::fmt::Debug for MasterDataCacheComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterDataCacheComponent")
            .field("key_version", &self.settings.master_data_key_version)
            .field("ttl", &self.settings.master_data_ttl())
            .finish_non_exhaustive()
    }
}

//! Dependency injection module using Shaku.
//!
//! - `CarelinkModule`: Postgres rows, Redis cache.
//! - `LocalModule`: in-process rows and cache, for local runs and tests.
//!
//! Both hand out exactly one instance of each cache and of the background
//! task supervisor per process.

use carelink_config::{AppConfig, CacheConfig, SecurityConfig};
use carelink_core::{module, CarelinkResult, HasComponent};
use carelink_repository::memory::{InMemoryMasterDataRepository, InMemoryProfileRepository};
use carelink_repository::{
    DatabasePool, DatabasePoolInterface, PgMasterDataRepository, PgProfileRepository,
};
use carelink_security::{TokenProvider, TokenProviderInterface};
use carelink_service::{
    BackgroundTasks, CacheInterface, InMemoryCache, MasterDataCache, MasterDataCacheComponent,
    MasterDataCacheComponentParameters, MasterDataService, MasterDataServiceComponent,
    ProfileAdminService, ProfileAdminServiceComponent, ProfileCache, ProfileCacheComponent,
    ProfileCacheComponentParameters, RedisCacheService, TaskSupervisor,
};
use std::sync::Arc;

module! {
    pub CarelinkModule {
        components = [
            DatabasePool,
            PgProfileRepository,
            PgMasterDataRepository,
            RedisCacheService,
            TaskSupervisor,
            TokenProvider,
            ProfileCacheComponent,
            MasterDataCacheComponent,
            ProfileAdminServiceComponent,
            MasterDataServiceComponent,
        ],
        providers = [],
    }
}

module! {
    pub LocalModule {
        components = [
            InMemoryProfileRepository,
            InMemoryMasterDataRepository,
            InMemoryCache,
            TaskSupervisor,
            TokenProvider,
            ProfileCacheComponent,
            MasterDataCacheComponent,
            ProfileAdminServiceComponent,
            MasterDataServiceComponent,
        ],
        providers = [],
    }
}

fn token_provider(security: &SecurityConfig) -> TokenProvider {
    TokenProvider::new(Arc::new(security.clone()))
}

fn profile_cache_parameters(cache: &CacheConfig) -> ProfileCacheComponentParameters {
    ProfileCacheComponentParameters {
        settings: cache.clone(),
    }
}

fn master_data_cache_parameters(cache: &CacheConfig) -> MasterDataCacheComponentParameters {
    MasterDataCacheComponentParameters {
        settings: cache.clone(),
    }
}

/// Builds the production module.
///
/// Connects to Postgres; the Redis pool is created lazily.
pub async fn build_carelink_module(config: &AppConfig) -> CarelinkResult<Arc<CarelinkModule>> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    assemble_carelink_module(db_pool, config)
}

/// Wires the production module around an existing pool.
pub fn assemble_carelink_module(
    db_pool: DatabasePool,
    config: &AppConfig,
) -> CarelinkResult<Arc<CarelinkModule>> {
    let cache = RedisCacheService::from_config(&config.redis)?;

    let module = CarelinkModule::builder()
        .with_component_parameters::<DatabasePool>(db_pool.into_parameters())
        .with_component_parameters::<RedisCacheService>(cache.into_parameters())
        .with_component_parameters::<TokenProvider>(
            token_provider(&config.security).into_parameters(),
        )
        .with_component_parameters::<ProfileCacheComponent>(profile_cache_parameters(
            &config.cache,
        ))
        .with_component_parameters::<MasterDataCacheComponent>(master_data_cache_parameters(
            &config.cache,
        ))
        .build();

    Ok(Arc::new(module))
}

/// Builds the in-process module. Starts with empty tables.
#[must_use]
pub fn build_local_module(config: &AppConfig) -> Arc<LocalModule> {
    let module = LocalModule::builder()
        .with_component_parameters::<TokenProvider>(
            token_provider(&config.security).into_parameters(),
        )
        .with_component_parameters::<ProfileCacheComponent>(profile_cache_parameters(
            &config.cache,
        ))
        .with_component_parameters::<MasterDataCacheComponent>(master_data_cache_parameters(
            &config.cache,
        ))
        .build();

    Arc::new(module)
}

/// What the HTTP layer and the shutdown path pull out of a module.
pub trait CacheLayerResolver {
    fn profile_cache(&self) -> Arc<dyn ProfileCache>;
    fn master_data_cache(&self) -> Arc<dyn MasterDataCache>;
    fn cache_store(&self) -> Arc<dyn CacheInterface>;
    fn background_tasks(&self) -> Arc<dyn BackgroundTasks>;
}

impl<M> CacheLayerResolver for M
where
    M: HasComponent<dyn ProfileCache>
        + HasComponent<dyn MasterDataCache>
        + HasComponent<dyn CacheInterface>
        + HasComponent<dyn BackgroundTasks>,
{
    fn profile_cache(&self) -> Arc<dyn ProfileCache> {
        self.resolve()
    }

    fn master_data_cache(&self) -> Arc<dyn MasterDataCache> {
        self.resolve()
    }

    fn cache_store(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }

    fn background_tasks(&self) -> Arc<dyn BackgroundTasks> {
        self.resolve()
    }
}

/// Database access for migrations and readiness.
pub trait DatabaseResolver {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for CarelinkModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

//! Application state for Axum handlers.

use carelink_core::HealthCheck;
use carelink_service::{MasterDataService, ProfileAdminService, ProfileCache};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub profile_cache: Arc<dyn ProfileCache>,
    pub profile_admin: Arc<dyn ProfileAdminService>,
    pub master_data: Arc<dyn MasterDataService>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    pub fn new(
        profile_cache: Arc<dyn ProfileCache>,
        profile_admin: Arc<dyn ProfileAdminService>,
        master_data: Arc<dyn MasterDataService>,
    ) -> Self {
        Self {
            profile_cache,
            profile_admin,
            master_data,
            health_checks: Vec::new(),
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn ProfileCache>
            + HasComponent<dyn ProfileAdminService>
            + HasComponent<dyn MasterDataService>,
    {
        Self::new(module.resolve(), module.resolve(), module.resolve())
    }

    /// Adds a readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}

//! Master-data reads and superadmin maintenance.

use crate::master_data_cache::MasterDataCache;
use async_trait::async_trait;
use carelink_core::{
    CarelinkError, CarelinkResult, Interface, Location, LocationInput, MasterDataId, MasterList,
    NamedEntryInput, Service, Specialty, ValidateExt,
};
use carelink_repository::MasterDataRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::info;

/// Master-data service trait.
///
/// Reads go through the cache. Every successful mutation drops all cached
/// lists before it returns.
#[async_trait]
pub trait MasterDataService: Interface + Send + Sync {
    async fn locations(&self) -> Vec<Location>;

    async fn services(&self) -> Vec<Service>;

    async fn specialties(&self) -> Vec<Specialty>;

    async fn create_location(&self, input: LocationInput) -> CarelinkResult<Location>;

    async fn update_location(
        &self,
        id: MasterDataId,
        input: LocationInput,
    ) -> CarelinkResult<Location>;

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<()>;

    async fn create_service(&self, input: NamedEntryInput) -> CarelinkResult<Service>;

    async fn update_service(
        &self,
        id: MasterDataId,
        input: NamedEntryInput,
    ) -> CarelinkResult<Service>;

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<()>;

    async fn create_specialty(&self, input: NamedEntryInput) -> CarelinkResult<Specialty>;

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: NamedEntryInput,
    ) -> CarelinkResult<Specialty>;

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<()>;

    /// Drops a single cached list so the next read reloads it.
    async fn refresh(&self, kind: MasterList);
}

/// Shaku component implementing `MasterDataService`.
#[derive(Component)]
#[shaku(interface = MasterDataService)]
pub struct MasterDataServiceComponent {
    #[shaku(inject)]
    master_data: Arc<dyn MasterDataRepository>,
    #[shaku(inject)]
    master_data_cache: Arc<dyn MasterDataCache>,
}

impl MasterDataServiceComponent {
    #[must_use]
    pub fn new(
        master_data: Arc<dyn MasterDataRepository>,
        master_data_cache: Arc<dyn MasterDataCache>,
    ) -> Self {
        Self {
            master_data,
            master_data_cache,
        }
    }

    async fn changed(&self, kind: MasterList, action: &str, id: MasterDataId) {
        self.master_data_cache.invalidate_all().await;
        info!("{} entry {} {}", kind, id, action);
    }
}

fn found<T>(row: Option<T>, kind: MasterList, id: MasterDataId) -> CarelinkResult<T> {
    row.ok_or_else(|| CarelinkError::not_found(kind.as_str(), id))
}

fn removed(existed: bool, kind: MasterList, id: MasterDataId) -> CarelinkResult<()> {
    if existed {
        Ok(())
    } else {
        Err(CarelinkError::not_found(kind.as_str(), id))
    }
}

#[async_trait]
impl MasterDataService for MasterDataServiceComponent {
    async fn locations(&self) -> Vec<Location> {
        self.master_data_cache.get_cached_locations().await
    }

    async fn services(&self) -> Vec<Service> {
        self.master_data_cache.get_cached_services().await
    }

    async fn specialties(&self) -> Vec<Specialty> {
        self.master_data_cache.get_cached_specialties().await
    }

    async fn create_location(&self, input: LocationInput) -> CarelinkResult<Location> {
        input.validate_request()?;
        let location = self.master_data.insert_location(&input).await?;
        self.changed(MasterList::Locations, "created", location.id).await;
        Ok(location)
    }

    async fn update_location(
        &self,
        id: MasterDataId,
        input: LocationInput,
    ) -> CarelinkResult<Location> {
        input.validate_request()?;
        let row = self.master_data.update_location(id, &input).await?;
        let location = found(row, MasterList::Locations, id)?;
        self.changed(MasterList::Locations, "updated", id).await;
        Ok(location)
    }

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<()> {
        let existed = self.master_data.delete_location(id).await?;
        removed(existed, MasterList::Locations, id)?;
        self.changed(MasterList::Locations, "deleted", id).await;
        Ok(())
    }

    async fn create_service(&self, input: NamedEntryInput) -> CarelinkResult<Service> {
        input.validate_request()?;
        let service = self.master_data.insert_service(&input).await?;
        self.changed(MasterList::Services, "created", service.id).await;
        Ok(service)
    }

    async fn update_service(
        &self,
        id: MasterDataId,
        input: NamedEntryInput,
    ) -> CarelinkResult<Service> {
        input.validate_request()?;
        let row = self.master_data.update_service(id, &input).await?;
        let service = found(row, MasterList::Services, id)?;
        self.changed(MasterList::Services, "updated", id).await;
        Ok(service)
    }

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<()> {
        let existed = self.master_data.delete_service(id).await?;
        removed(existed, MasterList::Services, id)?;
        self.changed(MasterList::Services, "deleted", id).await;
        Ok(())
    }

    async fn create_specialty(&self, input: NamedEntryInput) -> CarelinkResult<Specialty> {
        input.validate_request()?;
        let specialty = self.master_data.insert_specialty(&input).await?;
        self.changed(MasterList::Specialties, "created", specialty.id).await;
        Ok(specialty)
    }

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: NamedEntryInput,
    ) -> CarelinkResult<Specialty> {
        input.validate_request()?;
        let row = self.master_data.update_specialty(id, &input).await?;
        let specialty = found(row, MasterList::Specialties, id)?;
        self.changed(MasterList::Specialties, "updated", id).await;
        Ok(specialty)
    }

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<()> {
        let existed = self.master_data.delete_specialty(id).await?;
        removed(existed, MasterList::Specialties, id)?;
        self.changed(MasterList::Specialties, "deleted", id).await;
        Ok(())
    }

    async fn refresh(&self, kind: MasterList) {
        self.master_data_cache.invalidate_list(kind).await;
        info!("{} cache refreshed", kind);
    }
}

impl std::fmt::Debug for MasterDataServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterDataServiceComponent")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::TaskSupervisor;
    use crate::master_data_cache::MasterDataCacheComponent;
    use crate::test_support::{FlakyMasterDataRepository, RecordingCache};
    use carelink_config::CacheConfig;

    struct Harness {
        cache: Arc<RecordingCache>,
        repo: Arc<FlakyMasterDataRepository>,
        tasks: Arc<TaskSupervisor>,
        service: MasterDataServiceComponent,
    }

    fn harness() -> Harness {
        let cache = Arc::new(RecordingCache::default());
        let repo = Arc::new(FlakyMasterDataRepository::seeded());
        let tasks = Arc::new(TaskSupervisor::new());
        let lists = Arc::new(MasterDataCacheComponent::new(
            cache.clone(),
            repo.clone(),
            tasks.clone(),
            CacheConfig::default(),
        ));
        let service = MasterDataServiceComponent::new(repo.clone(), lists);
        Harness {
            cache,
            repo,
            tasks,
            service,
        }
    }

    async fn warm_all(h: &Harness) {
        h.service.locations().await;
        h.service.services().await;
        h.service.specialties().await;
        h.tasks.wait_idle().await;
    }

    async fn cached_keys(h: &Harness) -> Vec<&'static str> {
        let mut keys = Vec::new();
        for key in ["v1:locations", "v1:services", "v1:specialties"] {
            if h.cache.contains(key).await {
                keys.push(key);
            }
        }
        keys
    }

    fn location(city: &str) -> LocationInput {
        LocationInput {
            city: city.to_string(),
            state: "Uttar Pradesh".to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_location_is_visible_on_next_read() {
        let h = harness();
        warm_all(&h).await;

        h.service.create_location(location("Agra")).await.unwrap();

        assert!(cached_keys(&h).await.is_empty());
        let locations = h.service.locations().await;
        assert_eq!(h.repo.fetches(), 4);
        assert!(locations.iter().any(|l| l.city == "Agra"));
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_caches_alone() {
        let h = harness();
        warm_all(&h).await;

        let err = h.service.create_location(location("   ")).await.unwrap_err();

        assert!(matches!(err, CarelinkError::Validation(_)));
        assert_eq!(cached_keys(&h).await.len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_everything() {
        let h = harness();
        let specialty = h
            .service
            .create_specialty(NamedEntryInput {
                name: "Neurology".to_string(),
                description: None,
            })
            .await
            .unwrap();
        warm_all(&h).await;

        let renamed = h
            .service
            .update_specialty(
                specialty.id,
                NamedEntryInput {
                    name: "Neurosurgery".to_string(),
                    description: Some("Brain and spine".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Neurosurgery");
        assert!(cached_keys(&h).await.is_empty());

        warm_all(&h).await;
        h.service.delete_specialty(specialty.id).await.unwrap();
        assert!(cached_keys(&h).await.is_empty());
        assert!(h
            .service
            .specialties()
            .await
            .iter()
            .all(|s| s.id != specialty.id));
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let h = harness();
        let id = MasterDataId::new();

        assert!(matches!(
            h.service.delete_service(id).await,
            Err(CarelinkError::NotFound { .. })
        ));
        assert!(matches!(
            h.service
                .update_location(id, location("Agra"))
                .await,
            Err(CarelinkError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_service_is_conflict() {
        let h = harness();

        let err = h
            .service
            .create_service(NamedEntryInput {
                name: "radiology".to_string(),
                description: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CarelinkError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_refresh_drops_one_list() {
        let h = harness();
        warm_all(&h).await;

        h.service.refresh(MasterList::Services).await;

        assert_eq!(cached_keys(&h).await, vec!["v1:locations", "v1:specialties"]);
    }
}

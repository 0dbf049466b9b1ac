//! In-process repositories.
//!
//! Used by tests and by local runs without Postgres. Ordering matches the
//! SQL implementations so cached lists look the same either way.

use crate::traits::{MasterDataRepository, ProfileRepository};
use async_trait::async_trait;
use carelink_core::{
    ApprovalStatus, CarelinkError, CarelinkResult, Location, LocationInput, MasterDataId,
    NamedEntryInput, Profile, ProfileId, Service, Specialty,
};
use chrono::Utc;
use dashmap::DashMap;
use shaku::Component;

/// Profiles held in a concurrent map.
#[derive(Component, Default)]
#[shaku(interface = ProfileRepository)]
pub struct InMemoryProfileRepository {
    #[shaku(default)]
    profiles: DashMap<ProfileId, Profile>,
}

impl InMemoryProfileRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let repo = Self::new();
        for profile in profiles {
            repo.profiles.insert(profile.id.clone(), profile);
        }
        repo
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> CarelinkResult<Option<Profile>> {
        Ok(self.profiles.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> CarelinkResult<Vec<Profile>> {
        let mut found: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|p| p.created_at);
        Ok(found)
    }

    async fn insert(&self, profile: &Profile) -> CarelinkResult<Profile> {
        let email_taken = self
            .profiles
            .iter()
            .any(|entry| entry.email.eq_ignore_ascii_case(&profile.email));
        if email_taken || self.profiles.contains_key(&profile.id) {
            return Err(CarelinkError::conflict(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, profile: &Profile) -> CarelinkResult<Option<Profile>> {
        Ok(self.profiles.get_mut(&profile.id).map(|mut entry| {
            let row = entry.value_mut();
            row.full_name.clone_from(&profile.full_name);
            row.role = profile.role;
            row.status = profile.status;
            row.hospital_id.clone_from(&profile.hospital_id);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: &ProfileId) -> CarelinkResult<bool> {
        Ok(self.profiles.remove(id).is_some())
    }
}

/// Master lists held in concurrent maps.
#[derive(Component, Default)]
#[shaku(interface = MasterDataRepository)]
pub struct InMemoryMasterDataRepository {
    #[shaku(default)]
    locations: DashMap<MasterDataId, Location>,
    #[shaku(default)]
    services: DashMap<MasterDataId, Service>,
    #[shaku(default)]
    specialties: DashMap<MasterDataId, Specialty>,
}

impl InMemoryMasterDataRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every list at once.
    #[must_use]
    pub fn seeded(
        locations: impl IntoIterator<Item = Location>,
        services: impl IntoIterator<Item = Service>,
        specialties: impl IntoIterator<Item = Specialty>,
    ) -> Self {
        let repo = Self::new();
        for location in locations {
            repo.locations.insert(location.id, location);
        }
        for service in services {
            repo.services.insert(service.id, service);
        }
        for specialty in specialties {
            repo.specialties.insert(specialty.id, specialty);
        }
        repo
    }

    fn name_taken<T>(
        map: &DashMap<MasterDataId, T>,
        name: &str,
        name_of: impl Fn(&T) -> &str,
        except: Option<MasterDataId>,
    ) -> bool {
        map.iter().any(|entry| {
            Some(*entry.key()) != except && name_of(entry.value()).eq_ignore_ascii_case(name)
        })
    }
}

fn sorted_values<T: Clone, K: Ord>(
    map: &DashMap<MasterDataId, T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut values: Vec<T> = map.iter().map(|entry| entry.value().clone()).collect();
    values.sort_by_key(key);
    values
}

#[async_trait]
impl MasterDataRepository for InMemoryMasterDataRepository {
    async fn list_locations(&self) -> CarelinkResult<Vec<Location>> {
        Ok(sorted_values(&self.locations, |l| {
            (l.city.clone(), l.state.clone())
        }))
    }

    async fn list_services(&self) -> CarelinkResult<Vec<Service>> {
        Ok(sorted_values(&self.services, |s| s.name.clone()))
    }

    async fn list_specialties(&self) -> CarelinkResult<Vec<Specialty>> {
        Ok(sorted_values(&self.specialties, |s| s.name.clone()))
    }

    async fn insert_location(&self, input: &LocationInput) -> CarelinkResult<Location> {
        let (city, state) = (input.city.trim(), input.state.trim());
        if self
            .locations
            .iter()
            .any(|entry| entry.city == city && entry.state == state)
        {
            return Err(CarelinkError::conflict(format!(
                "location {city}, {state} already exists"
            )));
        }

        let location = Location {
            id: MasterDataId::new(),
            city: city.to_string(),
            state: state.to_string(),
        };
        self.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update_location(
        &self,
        id: MasterDataId,
        input: &LocationInput,
    ) -> CarelinkResult<Option<Location>> {
        Ok(self.locations.get_mut(&id).map(|mut entry| {
            let row = entry.value_mut();
            row.city = input.city.trim().to_string();
            row.state = input.state.trim().to_string();
            row.clone()
        }))
    }

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<bool> {
        Ok(self.locations.remove(&id).is_some())
    }

    async fn insert_service(&self, input: &NamedEntryInput) -> CarelinkResult<Service> {
        let name = input.name.trim();
        if Self::name_taken(&self.services, name, |s| s.name.as_str(), None) {
            return Err(CarelinkError::conflict(format!("service {name} already exists")));
        }

        let service = Service {
            id: MasterDataId::new(),
            name: name.to_string(),
            description: input.description.clone(),
        };
        self.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Service>> {
        let name = input.name.trim();
        if Self::name_taken(&self.services, name, |s| s.name.as_str(), Some(id)) {
            return Err(CarelinkError::conflict(format!("service {name} already exists")));
        }

        Ok(self.services.get_mut(&id).map(|mut entry| {
            let row = entry.value_mut();
            row.name = name.to_string();
            row.description.clone_from(&input.description);
            row.clone()
        }))
    }

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<bool> {
        Ok(self.services.remove(&id).is_some())
    }

    async fn insert_specialty(&self, input: &NamedEntryInput) -> CarelinkResult<Specialty> {
        let name = input.name.trim();
        if Self::name_taken(&self.specialties, name, |s| s.name.as_str(), None) {
            return Err(CarelinkError::conflict(format!("specialty {name} already exists")));
        }

        let specialty = Specialty {
            id: MasterDataId::new(),
            name: name.to_string(),
            description: input.description.clone(),
        };
        self.specialties.insert(specialty.id, specialty.clone());
        Ok(specialty)
    }

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Specialty>> {
        let name = input.name.trim();
        if Self::name_taken(&self.specialties, name, |s| s.name.as_str(), Some(id)) {
            return Err(CarelinkError::conflict(format!("specialty {name} already exists")));
        }

        Ok(self.specialties.get_mut(&id).map(|mut entry| {
            let row = entry.value_mut();
            row.name = name.to_string();
            row.description.clone_from(&input.description);
            row.clone()
        }))
    }

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<bool> {
        Ok(self.specialties.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_core::{HospitalId, ProfileRole};

    fn profile(id: &str, email: &str, status: ApprovalStatus) -> Profile {
        let now = Utc::now();
        Profile {
            id: ProfileId::new(id),
            email: email.to_string(),
            full_name: None,
            role: ProfileRole::Admin,
            status,
            hospital_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn location(city: &str, state: &str) -> LocationInput {
        LocationInput {
            city: city.to_string(),
            state: state.to_string(),
        }
    }

    fn named(name: &str) -> NamedEntryInput {
        NamedEntryInput {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_profile_insert_find_update_delete() {
        let repo = InMemoryProfileRepository::new();
        let id = ProfileId::new("u1");

        repo.insert(&profile("u1", "a@h1.test", ApprovalStatus::Pending))
            .await
            .unwrap();

        let mut row = repo.find_by_id(&id).await.unwrap().unwrap();
        row.status = ApprovalStatus::Approved;
        row.hospital_id = Some(HospitalId::new("h1"));
        let updated = repo.update(&row).await.unwrap().unwrap();
        assert_eq!(updated.status, ApprovalStatus::Approved);
        assert_eq!(updated.hospital_id, Some(HospitalId::new("h1")));

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_duplicate_email_conflicts() {
        let repo = InMemoryProfileRepository::new();
        repo.insert(&profile("u1", "a@h1.test", ApprovalStatus::Pending))
            .await
            .unwrap();

        let err = repo
            .insert(&profile("u2", "A@H1.test", ApprovalStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, CarelinkError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_profile_returns_none() {
        let repo = InMemoryProfileRepository::new();
        let result = repo
            .update(&profile("ghost", "g@h.test", ApprovalStatus::Approved))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_status_filters() {
        let repo = InMemoryProfileRepository::with_profiles(vec![
            profile("u1", "a@h.test", ApprovalStatus::Pending),
            profile("u2", "b@h.test", ApprovalStatus::Approved),
            profile("u3", "c@h.test", ApprovalStatus::Pending),
        ]);

        let pending = repo.find_by_status(ApprovalStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|p| p.status == ApprovalStatus::Pending));
    }

    #[tokio::test]
    async fn test_locations_ordered_by_city_then_state() {
        let repo = InMemoryMasterDataRepository::new();
        repo.insert_location(&location("Pune", "Maharashtra")).await.unwrap();
        repo.insert_location(&location("Aurangabad", "Maharashtra")).await.unwrap();
        repo.insert_location(&location("Aurangabad", "Bihar")).await.unwrap();

        let cities: Vec<(String, String)> = repo
            .list_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|l| (l.city, l.state))
            .collect();
        assert_eq!(
            cities,
            vec![
                ("Aurangabad".to_string(), "Bihar".to_string()),
                ("Aurangabad".to_string(), "Maharashtra".to_string()),
                ("Pune".to_string(), "Maharashtra".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_services_ordered_by_name_and_unique() {
        let repo = InMemoryMasterDataRepository::new();
        repo.insert_service(&named("Radiology")).await.unwrap();
        repo.insert_service(&named("Cardiac Surgery")).await.unwrap();

        let names: Vec<String> = repo
            .list_services()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Cardiac Surgery", "Radiology"]);

        let err = repo.insert_service(&named("radiology")).await.unwrap_err();
        assert!(matches!(err, CarelinkError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_specialty_update_and_delete() {
        let repo = InMemoryMasterDataRepository::new();
        let created = repo.insert_specialty(&named("Neurology")).await.unwrap();

        let updated = repo
            .update_specialty(created.id, &named("Neurosurgery"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Neurosurgery");

        assert!(repo.delete_specialty(created.id).await.unwrap());
        assert!(repo
            .update_specialty(created.id, &named("Neurology"))
            .await
            .unwrap()
            .is_none());
    }

    shaku::module! {
        InMemoryStoreModule {
            components = [InMemoryProfileRepository, InMemoryMasterDataRepository],
            providers = [],
        }
    }

    #[tokio::test]
    async fn test_module_builds_empty_stores_without_parameters() {
        use shaku::HasComponent;

        let module = InMemoryStoreModule::builder().build();
        let profiles: std::sync::Arc<dyn ProfileRepository> = module.resolve();
        let master_data: std::sync::Arc<dyn MasterDataRepository> = module.resolve();

        assert!(profiles
            .find_by_id(&ProfileId::new("u1"))
            .await
            .unwrap()
            .is_none());
        assert!(master_data.list_locations().await.unwrap().is_empty());
    }
}

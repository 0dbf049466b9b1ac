//! Store doubles shared by the service tests.

use crate::cache::{CacheInterface, InMemoryCache};
use async_trait::async_trait;
use carelink_core::{
    ApprovalStatus, CarelinkError, CarelinkResult, HospitalId, Location, LocationInput,
    MasterDataId, NamedEntryInput, Profile, ProfileId, ProfileRole, Service, Specialty,
};
use carelink_repository::memory::{InMemoryMasterDataRepository, InMemoryProfileRepository};
use carelink_repository::{MasterDataRepository, ProfileRepository};
use chrono::Utc;
use std::future::pending;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn profile(id: &str, role: ProfileRole, status: ApprovalStatus, hospital: Option<&str>) -> Profile {
    let now = Utc::now();
    Profile {
        id: ProfileId::new(id),
        email: format!("{id}@carelink.test"),
        full_name: None,
        role,
        status,
        hospital_id: hospital.map(HospitalId::new),
        created_at: now,
        updated_at: now,
    }
}

pub fn location(city: &str, state: &str) -> Location {
    Location {
        id: MasterDataId::new(),
        city: city.to_string(),
        state: state.to_string(),
    }
}

pub fn named_service(name: &str) -> Service {
    Service {
        id: MasterDataId::new(),
        name: name.to_string(),
        description: None,
    }
}

pub fn named_specialty(name: &str) -> Specialty {
    Specialty {
        id: MasterDataId::new(),
        name: name.to_string(),
        description: None,
    }
}

/// In-memory cache that counts calls and remembers write TTLs.
#[derive(Default)]
pub struct RecordingCache {
    inner: InMemoryCache,
    pub gets: AtomicU32,
    pub deletes: AtomicU32,
    pub writes: Mutex<Vec<(String, Duration)>>,
}

impl RecordingCache {
    pub fn gets(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> u32 {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn written_keys(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn written_ttl(&self, key: &str) -> Option<Duration> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, ttl)| *ttl)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.get_raw(key).await.unwrap().is_some()
    }

    pub async fn seed(&self, key: &str, json: &str) {
        self.inner
            .set_raw(key, json, Duration::from_secs(3600))
            .await
            .unwrap();
    }
}

#[async_trait]
impl CacheInterface for RecordingCache {
    async fn get_raw(&self, key: &str) -> CarelinkResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_raw(key).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CarelinkResult<()> {
        self.writes.lock().unwrap().push((key.to_string(), ttl));
        self.inner.set_raw(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CarelinkResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Cache whose every operation hangs.
pub struct HangingCache;

#[async_trait]
impl CacheInterface for HangingCache {
    async fn get_raw(&self, _key: &str) -> CarelinkResult<Option<String>> {
        pending().await
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> CarelinkResult<()> {
        pending().await
    }

    async fn delete(&self, _key: &str) -> CarelinkResult<bool> {
        pending().await
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Cache that refuses every operation.
#[derive(Default)]
pub struct FailingCache {
    pub deletes: AtomicU32,
}

#[async_trait]
impl CacheInterface for FailingCache {
    async fn get_raw(&self, _key: &str) -> CarelinkResult<Option<String>> {
        Err(CarelinkError::Cache("connection refused".to_string()))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> CarelinkResult<()> {
        Err(CarelinkError::Cache("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> CarelinkResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Err(CarelinkError::Cache("connection refused".to_string()))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Profile store that counts lookups and can be switched to failing.
#[derive(Default)]
pub struct CountingProfileRepository {
    pub inner: InMemoryProfileRepository,
    pub lookups: AtomicU32,
    pub broken: std::sync::atomic::AtomicBool,
}

impl CountingProfileRepository {
    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            inner: InMemoryProfileRepository::with_profiles(profiles),
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn break_store(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> CarelinkResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(CarelinkError::Database("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileRepository for CountingProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> CarelinkResult<Option<Profile>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_by_id(id).await
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> CarelinkResult<Vec<Profile>> {
        self.check()?;
        self.inner.find_by_status(status).await
    }

    async fn insert(&self, profile: &Profile) -> CarelinkResult<Profile> {
        self.check()?;
        self.inner.insert(profile).await
    }

    async fn update(&self, profile: &Profile) -> CarelinkResult<Option<Profile>> {
        self.check()?;
        self.inner.update(profile).await
    }

    async fn delete(&self, id: &ProfileId) -> CarelinkResult<bool> {
        self.check()?;
        self.inner.delete(id).await
    }
}

/// Master-data store that counts list fetches and fails the first
/// `failures` of them.
#[derive(Default)]
pub struct FlakyMasterDataRepository {
    pub inner: InMemoryMasterDataRepository,
    pub fetches: AtomicU32,
    pub failures: AtomicU32,
}

impl FlakyMasterDataRepository {
    pub fn seeded() -> Self {
        Self {
            inner: InMemoryMasterDataRepository::seeded(
                [location("Pune", "Maharashtra"), location("Chennai", "Tamil Nadu")],
                [named_service("Radiology"), named_service("Emergency Care")],
                [named_specialty("Cardiology")],
            ),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing_first(self, failures: u32) -> Self {
        self.failures.store(failures, Ordering::SeqCst);
        self
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    fn fetch(&self) -> CarelinkResult<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(CarelinkError::Database("too many connections".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MasterDataRepository for FlakyMasterDataRepository {
    async fn list_locations(&self) -> CarelinkResult<Vec<Location>> {
        self.fetch()?;
        self.inner.list_locations().await
    }

    async fn list_services(&self) -> CarelinkResult<Vec<Service>> {
        self.fetch()?;
        self.inner.list_services().await
    }

    async fn list_specialties(&self) -> CarelinkResult<Vec<Specialty>> {
        self.fetch()?;
        self.inner.list_specialties().await
    }

    async fn insert_location(&self, input: &LocationInput) -> CarelinkResult<Location> {
        self.inner.insert_location(input).await
    }

    async fn update_location(
        &self,
        id: MasterDataId,
        input: &LocationInput,
    ) -> CarelinkResult<Option<Location>> {
        self.inner.update_location(id, input).await
    }

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.inner.delete_location(id).await
    }

    async fn insert_service(&self, input: &NamedEntryInput) -> CarelinkResult<Service> {
        self.inner.insert_service(input).await
    }

    async fn update_service(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Service>> {
        self.inner.update_service(id, input).await
    }

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.inner.delete_service(id).await
    }

    async fn insert_specialty(&self, input: &NamedEntryInput) -> CarelinkResult<Specialty> {
        self.inner.insert_specialty(input).await
    }

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Specialty>> {
        self.inner.update_specialty(id, input).await
    }

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.inner.delete_specialty(id).await
    }
}

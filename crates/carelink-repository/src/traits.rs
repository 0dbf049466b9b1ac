//! Repository trait definitions.
//!
//! These are the relational-store seams the caches read through. Lists come
//! back complete and in display order; nothing here pages.

use carelink_core::{
    ApprovalStatus, CarelinkResult, Interface, Location, LocationInput, MasterDataId,
    NamedEntryInput, Profile, ProfileId, Service, Specialty,
};
use async_trait::async_trait;

/// Access to the `profiles` table.
#[async_trait]
pub trait ProfileRepository: Interface + Send + Sync {
    /// Finds a profile by identity.
    async fn find_by_id(&self, id: &ProfileId) -> CarelinkResult<Option<Profile>>;

    /// Lists profiles in the given approval state, oldest first.
    async fn find_by_status(&self, status: ApprovalStatus) -> CarelinkResult<Vec<Profile>>;

    /// Inserts a new profile. Duplicate identities or emails are a `Conflict`.
    async fn insert(&self, profile: &Profile) -> CarelinkResult<Profile>;

    /// Overwrites role, status, hospital link and name of an existing row.
    ///
    /// Returns `None` when the row does not exist.
    async fn update(&self, profile: &Profile) -> CarelinkResult<Option<Profile>>;

    /// Deletes a profile. Returns whether a row was removed.
    async fn delete(&self, id: &ProfileId) -> CarelinkResult<bool>;
}

/// Access to the `locations`, `services_list` and `specialties_list` tables.
#[async_trait]
pub trait MasterDataRepository: Interface + Send + Sync {
    /// All locations ordered by city, then state.
    async fn list_locations(&self) -> CarelinkResult<Vec<Location>>;

    /// All services ordered by name.
    async fn list_services(&self) -> CarelinkResult<Vec<Service>>;

    /// All specialties ordered by name.
    async fn list_specialties(&self) -> CarelinkResult<Vec<Specialty>>;

    async fn insert_location(&self, input: &LocationInput) -> CarelinkResult<Location>;

    async fn update_location(
        &self,
        id: MasterDataId,
        input: &LocationInput,
    ) -> CarelinkResult<Option<Location>>;

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<bool>;

    async fn insert_service(&self, input: &NamedEntryInput) -> CarelinkResult<Service>;

    async fn update_service(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Service>>;

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<bool>;

    async fn insert_specialty(&self, input: &NamedEntryInput) -> CarelinkResult<Specialty>;

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Specialty>>;

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<bool>;
}

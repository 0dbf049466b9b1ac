//! Profile lifecycle actions.
//!
//! Every action that touches a `profiles` row drops the cached profile
//! before returning, so the next gated request re-reads the row.

use crate::dto::{ApproveProfileRequest, AssignHospitalRequest, ChangeStatusRequest};
use crate::profile_cache::ProfileCache;
use async_trait::async_trait;
use carelink_core::{
    ApprovalStatus, CarelinkError, CarelinkResult, Interface, NewProfile, Profile, ProfileId,
    ValidateExt,
};
use carelink_repository::ProfileRepository;
use chrono::Utc;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Profile administration service trait.
#[async_trait]
pub trait ProfileAdminService: Interface + Send + Sync {
    /// Creates the profile row for a new sign-up, pending approval.
    async fn provision_profile(&self, request: NewProfile) -> CarelinkResult<Profile>;

    /// Called on sign-in so the session starts from the current row.
    async fn record_sign_in(&self, id: &ProfileId) -> CarelinkResult<()>;

    /// Approves a profile, linking the hospital when one is given.
    async fn approve_profile(
        &self,
        id: &ProfileId,
        request: ApproveProfileRequest,
    ) -> CarelinkResult<Profile>;

    async fn reject_profile(&self, id: &ProfileId) -> CarelinkResult<Profile>;

    async fn change_status(
        &self,
        id: &ProfileId,
        request: ChangeStatusRequest,
    ) -> CarelinkResult<Profile>;

    async fn assign_hospital(
        &self,
        id: &ProfileId,
        request: AssignHospitalRequest,
    ) -> CarelinkResult<Profile>;

    /// Deletes the row.
    async fn purge_profile(&self, id: &ProfileId) -> CarelinkResult<()>;

    /// Profiles waiting for approval, oldest first. Not cached.
    async fn list_pending(&self) -> CarelinkResult<Vec<Profile>>;
}

/// Shaku component implementing `ProfileAdminService`.
#[derive(Component)]
#[shaku(interface = ProfileAdminService)]
pub struct ProfileAdminServiceComponent {
    #[shaku(inject)]
    profiles: Arc<dyn ProfileRepository>,
    #[shaku(inject)]
    profile_cache: Arc<dyn ProfileCache>,
}

impl ProfileAdminServiceComponent {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>, profile_cache: Arc<dyn ProfileCache>) -> Self {
        Self {
            profiles,
            profile_cache,
        }
    }

    async fn mutate<F>(&self, id: &ProfileId, change: F) -> CarelinkResult<Profile>
    where
        F: FnOnce(&mut Profile) + Send,
    {
        let mut profile = self
            .profiles
            .find_by_id(id)
            .await?
            .ok_or_else(|| CarelinkError::not_found("Profile", id))?;

        change(&mut profile);

        let updated = self
            .profiles
            .update(&profile)
            .await?
            .ok_or_else(|| CarelinkError::not_found("Profile", id))?;

        self.profile_cache.invalidate_profile(id).await;
        Ok(updated)
    }
}

#[async_trait]
impl ProfileAdminService for ProfileAdminServiceComponent {
    async fn provision_profile(&self, request: NewProfile) -> CarelinkResult<Profile> {
        debug!("Provisioning profile: {}", request.id);
        request.validate_request()?;

        let now = Utc::now();
        let profile = Profile {
            id: request.id,
            email: request.email.trim().to_lowercase(),
            full_name: request.full_name,
            role: request.role,
            status: ApprovalStatus::Pending,
            hospital_id: request.hospital_id,
            created_at: now,
            updated_at: now,
        };

        let saved = self.profiles.insert(&profile).await?;
        self.profile_cache.invalidate_profile(&saved.id).await;

        info!("Profile provisioned: {} ({})", saved.id, saved.role);
        Ok(saved)
    }

    async fn record_sign_in(&self, id: &ProfileId) -> CarelinkResult<()> {
        self.profile_cache.invalidate_profile(id).await;
        debug!("Sign-in recorded for {}", id);
        Ok(())
    }

    async fn approve_profile(
        &self,
        id: &ProfileId,
        request: ApproveProfileRequest,
    ) -> CarelinkResult<Profile> {
        let profile = self
            .mutate(id, |p| {
                p.status = ApprovalStatus::Approved;
                if let Some(hospital_id) = request.hospital_id {
                    p.hospital_id = Some(hospital_id);
                }
            })
            .await?;

        info!("Profile approved: {}", id);
        Ok(profile)
    }

    async fn reject_profile(&self, id: &ProfileId) -> CarelinkResult<Profile> {
        let profile = self
            .mutate(id, |p| p.status = ApprovalStatus::Rejected)
            .await?;

        info!("Profile rejected: {}", id);
        Ok(profile)
    }

    async fn change_status(
        &self,
        id: &ProfileId,
        request: ChangeStatusRequest,
    ) -> CarelinkResult<Profile> {
        let status = request.status;
        let profile = self.mutate(id, |p| p.status = status).await?;

        info!("Profile {} status changed to {}", id, status);
        Ok(profile)
    }

    async fn assign_hospital(
        &self,
        id: &ProfileId,
        request: AssignHospitalRequest,
    ) -> CarelinkResult<Profile> {
        let profile = self
            .mutate(id, |p| p.hospital_id = request.hospital_id)
            .await?;

        info!(
            "Profile {} hospital link set to {:?}",
            id,
            profile.hospital_id.as_ref().map(ToString::to_string)
        );
        Ok(profile)
    }

    async fn purge_profile(&self, id: &ProfileId) -> CarelinkResult<()> {
        let existed = self.profiles.delete(id).await?;
        self.profile_cache.invalidate_profile(id).await;

        if !existed {
            return Err(CarelinkError::not_found("Profile", id));
        }

        info!("Profile purged: {}", id);
        Ok(())
    }

    async fn list_pending(&self) -> CarelinkResult<Vec<Profile>> {
        self.profiles.find_by_status(ApprovalStatus::Pending).await
    }
}

impl std::fmt::Debug for ProfileAdminServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileAdminServiceComponent")
            .finish_non_exhaustive()
    }
}

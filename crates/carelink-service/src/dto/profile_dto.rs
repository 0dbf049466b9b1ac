//! Profile-related DTOs.

use carelink_core::{ApprovalStatus, CachedProfile, HospitalId, Profile, ProfileId, ProfileRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to approve a pending profile, optionally linking a hospital.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ApproveProfileRequest {
    #[serde(default)]
    pub hospital_id: Option<HospitalId>,
}

/// Request to move a profile to an arbitrary approval state.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    pub status: ApprovalStatus,
}

/// Request to link (or unlink, with `null`) a hospital.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignHospitalRequest {
    pub hospital_id: Option<HospitalId>,
}

/// Profile response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: ProfileId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: ProfileRole,
    pub status: ApprovalStatus,
    pub hospital_id: Option<HospitalId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role,
            status: profile.status,
            hospital_id: profile.hospital_id,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// What the caller's own session resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProfileResponse {
    pub id: ProfileId,
    pub role: ProfileRole,
    pub status: ApprovalStatus,
    pub hospital_id: Option<HospitalId>,
    /// Where the UI should land this caller.
    pub home: String,
}

impl From<CachedProfile> for SessionProfileResponse {
    fn from(profile: CachedProfile) -> Self {
        let home = match profile.status {
            ApprovalStatus::Approved => profile.role.home_path(),
            ApprovalStatus::Pending => "/pending-approval",
            ApprovalStatus::Rejected => "/unauthorized",
        };
        Self {
            id: profile.id,
            role: profile.role,
            status: profile.status,
            hospital_id: profile.hospital_id,
            home: home.to_string(),
        }
    }
}

/// Response of a list refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub list: String,
    pub message: String,
}

//! Profile entity and its cached authorization projection.

use super::{ApprovalStatus, ProfileRole};
use crate::{HospitalId, ProfileId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity issued by the authentication provider.
    pub id: ProfileId,

    /// Contact email.
    pub email: String,

    /// Display name.
    pub full_name: Option<String>,

    /// Assigned role.
    pub role: ProfileRole,

    /// Approval state.
    pub status: ApprovalStatus,

    /// Hospital this profile administers.
    pub hospital_id: Option<HospitalId>,

    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Projects the row onto the fields the request gate needs.
    #[must_use]
    pub fn to_cached(&self) -> CachedProfile {
        CachedProfile {
            id: self.id.clone(),
            role: self.role,
            status: self.status,
            hospital_id: self.hospital_id.clone(),
        }
    }
}

/// Authorization-relevant subset of a profile, as stored under `profile:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProfile {
    pub id: ProfileId,
    pub role: ProfileRole,
    pub status: ApprovalStatus,
    pub hospital_id: Option<HospitalId>,
}

impl CachedProfile {
    /// An admin without a hospital link is mid-provisioning.
    ///
    /// Such a profile is handed back to callers but never written to the cache,
    /// and a cached copy of one is ignored on read.
    #[must_use]
    pub const fn is_incompletely_provisioned(&self) -> bool {
        matches!(self.role, ProfileRole::Admin) && self.hospital_id.is_none()
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.status.is_approved()
    }
}

impl From<Profile> for CachedProfile {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            role: profile.role,
            status: profile.status,
            hospital_id: profile.hospital_id,
        }
    }
}

/// Input for provisioning a profile on signup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProfile {
    pub id: ProfileId,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 128))]
    pub full_name: Option<String>,

    #[serde(default)]
    pub role: ProfileRole,

    #[serde(default)]
    pub hospital_id: Option<HospitalId>,
}

//! Postgres profile repository implementation.

use crate::{traits::ProfileRepository, DatabasePoolInterface};
use async_trait::async_trait;
use carelink_core::{
    ApprovalStatus, CarelinkError, CarelinkResult, HospitalId, Profile, ProfileId, ProfileRole,
};
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Postgres profile repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProfileRepository)]
pub struct PgProfileRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgProfileRepository {
    /// Creates a new Postgres profile repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    full_name: Option<String>,
    role: String,
    status: String,
    hospital_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = CarelinkError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = ProfileRole::from_str(&row.role).ok_or_else(|| {
            CarelinkError::Internal(format!("Invalid role in database: {}", row.role))
        })?;
        let status = ApprovalStatus::from_str(&row.status).ok_or_else(|| {
            CarelinkError::Internal(format!("Invalid status in database: {}", row.status))
        })?;

        Ok(Profile {
            id: ProfileId::from(row.id),
            email: row.email,
            full_name: row.full_name,
            role,
            status,
            hospital_id: row.hospital_id.map(HospitalId::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str =
    "id, email, full_name, role, status, hospital_id, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> CarelinkResult<Option<Profile>> {
        debug!("Finding profile by id: {}", id);

        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> CarelinkResult<Vec<Profile>> {
        debug!("Finding profiles by status: {}", status);

        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE status = $1 ORDER BY created_at ASC"
        ))
        .bind(status.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn insert(&self, profile: &Profile) -> CarelinkResult<Profile> {
        debug!("Inserting profile: {}", profile.id);

        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles (id, email, full_name, role, status, hospital_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id.as_str())
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(profile.role.as_str())
        .bind(profile.status.as_str())
        .bind(profile.hospital_id.as_ref().map(HospitalId::as_str))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(self.pool.inner())
        .await?;

        Profile::try_from(row)
    }

    async fn update(&self, profile: &Profile) -> CarelinkResult<Option<Profile>> {
        debug!("Updating profile: {}", profile.id);

        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE profiles
            SET full_name = $2, role = $3, status = $4, hospital_id = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id.as_str())
        .bind(&profile.full_name)
        .bind(profile.role.as_str())
        .bind(profile.status.as_str())
        .bind(profile.hospital_id.as_ref().map(HospitalId::as_str))
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn delete(&self, id: &ProfileId) -> CarelinkResult<bool> {
        debug!("Deleting profile: {}", id);

        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

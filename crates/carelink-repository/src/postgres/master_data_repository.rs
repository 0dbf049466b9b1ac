//! Postgres master-data repository implementation.
//!
//! Services and specialties share one row shape, so both go through the
//! `*_named` helpers with the table name taken from [`MasterList::table`].

use crate::{traits::MasterDataRepository, DatabasePoolInterface};
use async_trait::async_trait;
use carelink_core::{
    CarelinkResult, Location, LocationInput, MasterDataId, MasterList, NamedEntryInput, Service,
    Specialty,
};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Postgres master-data repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = MasterDataRepository)]
pub struct PgMasterDataRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgMasterDataRepository {
    /// Creates a new Postgres master-data repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn list_named(&self, kind: MasterList) -> CarelinkResult<Vec<NamedRow>> {
        debug!("Listing {}", kind);

        let rows = sqlx::query_as::<_, NamedRow>(&format!(
            "SELECT id, name, description FROM {} ORDER BY name ASC",
            kind.table()
        ))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows)
    }

    async fn insert_named(
        &self,
        kind: MasterList,
        input: &NamedEntryInput,
    ) -> CarelinkResult<NamedRow> {
        debug!("Inserting into {}: {}", kind, input.name);

        let row = sqlx::query_as::<_, NamedRow>(&format!(
            "INSERT INTO {} (id, name, description) VALUES ($1, $2, $3) RETURNING id, name, description",
            kind.table()
        ))
        .bind(MasterDataId::new().into_inner())
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row)
    }

    async fn update_named(
        &self,
        kind: MasterList,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<NamedRow>> {
        debug!("Updating {} row {}", kind, id);

        let row = sqlx::query_as::<_, NamedRow>(&format!(
            "UPDATE {} SET name = $2, description = $3 WHERE id = $1 RETURNING id, name, description",
            kind.table()
        ))
        .bind(id.into_inner())
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row)
    }

    async fn delete_row(&self, kind: MasterList, id: MasterDataId) -> CarelinkResult<bool> {
        debug!("Deleting {} row {}", kind, id);

        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, FromRow)]
struct LocationRow {
    id: Uuid,
    city: String,
    state: String,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: MasterDataId::from(row.id),
            city: row.city,
            state: row.state,
        }
    }
}

#[derive(Debug, FromRow)]
struct NamedRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

impl From<NamedRow> for Service {
    fn from(row: NamedRow) -> Self {
        Self {
            id: MasterDataId::from(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

impl From<NamedRow> for Specialty {
    fn from(row: NamedRow) -> Self {
        Self {
            id: MasterDataId::from(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

#[async_trait]
impl MasterDataRepository for PgMasterDataRepository {
    async fn list_locations(&self) -> CarelinkResult<Vec<Location>> {
        debug!("Listing locations");

        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT id, city, state FROM locations ORDER BY city ASC, state ASC",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Location::from).collect())
    }

    async fn list_services(&self) -> CarelinkResult<Vec<Service>> {
        let rows = self.list_named(MasterList::Services).await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn list_specialties(&self) -> CarelinkResult<Vec<Specialty>> {
        let rows = self.list_named(MasterList::Specialties).await?;
        Ok(rows.into_iter().map(Specialty::from).collect())
    }

    async fn insert_location(&self, input: &LocationInput) -> CarelinkResult<Location> {
        debug!("Inserting location: {}, {}", input.city, input.state);

        let row = sqlx::query_as::<_, LocationRow>(
            "INSERT INTO locations (id, city, state) VALUES ($1, $2, $3) RETURNING id, city, state",
        )
        .bind(MasterDataId::new().into_inner())
        .bind(input.city.trim())
        .bind(input.state.trim())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(Location::from(row))
    }

    async fn update_location(
        &self,
        id: MasterDataId,
        input: &LocationInput,
    ) -> CarelinkResult<Option<Location>> {
        debug!("Updating location: {}", id);

        let row = sqlx::query_as::<_, LocationRow>(
            "UPDATE locations SET city = $2, state = $3 WHERE id = $1 RETURNING id, city, state",
        )
        .bind(id.into_inner())
        .bind(input.city.trim())
        .bind(input.state.trim())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Location::from))
    }

    async fn delete_location(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.delete_row(MasterList::Locations, id).await
    }

    async fn insert_service(&self, input: &NamedEntryInput) -> CarelinkResult<Service> {
        let row = self.insert_named(MasterList::Services, input).await?;
        Ok(Service::from(row))
    }

    async fn update_service(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Service>> {
        let row = self.update_named(MasterList::Services, id, input).await?;
        Ok(row.map(Service::from))
    }

    async fn delete_service(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.delete_row(MasterList::Services, id).await
    }

    async fn insert_specialty(&self, input: &NamedEntryInput) -> CarelinkResult<Specialty> {
        let row = self.insert_named(MasterList::Specialties, input).await?;
        Ok(Specialty::from(row))
    }

    async fn update_specialty(
        &self,
        id: MasterDataId,
        input: &NamedEntryInput,
    ) -> CarelinkResult<Option<Specialty>> {
        let row = self.update_named(MasterList::Specialties, id, input).await?;
        Ok(row.map(Specialty::from))
    }

    async fn delete_specialty(&self, id: MasterDataId) -> CarelinkResult<bool> {
        self.delete_row(MasterList::Specialties, id).await
    }
}

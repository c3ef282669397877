//! Database operations for stock locations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{LocationId, TenantId};

use super::RepositoryError;
use crate::models::location::{CreateLocationInput, Location, UpdateLocationInput};

/// Internal row type for location queries.
#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: i32,
    tenant_id: i32,
    name: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: LocationId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// Repository for location database operations.
pub struct LocationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LocationRepository<'a> {
    /// Create a new location repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        tenant: TenantId,
        input: &CreateLocationInput,
    ) -> Result<Location, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            INSERT INTO locations (tenant_id, name, address)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, address, created_at
            ",
        )
        .bind(tenant)
        .bind(&input.name)
        .bind(&input.address)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a location by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        tenant: TenantId,
        id: LocationId,
    ) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, tenant_id, name, address, created_at FROM locations \
             WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all locations for a tenant, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, tenant: TenantId) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT id, tenant_id, name, address, created_at FROM locations \
             WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(tenant)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a location. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the location doesn't exist
    /// for this tenant.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: LocationId,
        input: &UpdateLocationInput,
    ) -> Result<Location, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            UPDATE locations
            SET name = COALESCE($3, name),
                address = COALESCE($4, address)
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, name, address, created_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(&input.name)
        .bind(&input.address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a location.
    ///
    /// # Returns
    ///
    /// `true` if the location was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, tenant: TenantId, id: LocationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM locations WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

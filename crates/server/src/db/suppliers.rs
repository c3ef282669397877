//! Database operations for suppliers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{SupplierId, TenantId};

use super::RepositoryError;
use crate::models::supplier::{CreateSupplierInput, Supplier, SupplierFilter, UpdateSupplierInput};

/// Internal row type for supplier queries.
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: i32,
    tenant_id: i32,
    name: String,
    contact_email: Option<String>,
    phone: Option<String>,
    industry: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: SupplierId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            name: row.name,
            contact_email: row.contact_email,
            phone: row.phone,
            industry: row.industry,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SUPPLIER_COLUMNS: &str =
    "id, tenant_id, name, contact_email, phone, industry, notes, created_at, updated_at";

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new supplier repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        tenant: TenantId,
        input: &CreateSupplierInput,
    ) -> Result<Supplier, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r"
            INSERT INTO suppliers (tenant_id, name, contact_email, phone, industry, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, tenant_id, name, contact_email, phone, industry, notes,
                      created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(&input.name)
        .bind(&input.contact_email)
        .bind(&input.phone)
        .bind(&input.industry)
        .bind(&input.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        tenant: TenantId,
        id: SupplierId,
    ) -> Result<Option<Supplier>, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List suppliers with filtering and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &SupplierFilter,
    ) -> Result<Vec<Supplier>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            r"
            SELECT {SUPPLIER_COLUMNS}
            FROM suppliers
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR name ILIKE $2)
                AND ($3::text IS NULL OR industry = $3)
            ORDER BY name ASC, id ASC
            LIMIT $4 OFFSET $5
            "
        ))
        .bind(tenant)
        .bind(search)
        .bind(&filter.industry)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count suppliers matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &SupplierFilter,
    ) -> Result<i64, RepositoryError> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM suppliers
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR name ILIKE $2)
                AND ($3::text IS NULL OR industry = $3)
            ",
        )
        .bind(tenant)
        .bind(search)
        .bind(&filter.industry)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Update a supplier. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier doesn't exist
    /// for this tenant.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: SupplierId,
        input: &UpdateSupplierInput,
    ) -> Result<Supplier, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r"
            UPDATE suppliers
            SET name = COALESCE($3, name),
                contact_email = COALESCE($4, contact_email),
                phone = COALESCE($5, phone),
                industry = COALESCE($6, industry),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, name, contact_email, phone, industry, notes,
                      created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact_email)
        .bind(&input.phone)
        .bind(&input.industry)
        .bind(&input.notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a supplier. Products keep existing with no supplier.
    ///
    /// # Returns
    ///
    /// `true` if the supplier was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` while purchase orders still
    /// reference the supplier.
    pub async fn delete(&self, tenant: TenantId, id: SupplierId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "Supplier is referenced by purchase orders".to_string(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a supplier exists for this tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, tenant: TenantId, id: SupplierId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant)
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}

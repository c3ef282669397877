//! Database operations for customers.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{CustomerId, TenantId};

use super::RepositoryError;
use crate::models::customer::{
    CreateCustomerInput, Customer, CustomerFilter, CustomerStatus, UpdateCustomerInput,
};

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    tenant_id: i32,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    status: CustomerStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CUSTOMER_COLUMNS: &str =
    "id, tenant_id, name, email, phone, status, created_at, updated_at";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer (always active).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        tenant: TenantId,
        input: &CreateCustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (tenant_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, name, email, phone, status, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        tenant: TenantId,
        id: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List customers with filtering and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &CustomerFilter,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
                AND ($3::customer_status IS NULL OR status = $3)
            ORDER BY name ASC, id ASC
            LIMIT $4 OFFSET $5
            "
        ))
        .bind(tenant)
        .bind(search)
        .bind(filter.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count customers matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &CustomerFilter,
    ) -> Result<i64, RepositoryError> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM customers
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
                AND ($3::customer_status IS NULL OR status = $3)
            ",
        )
        .bind(tenant)
        .bind(search)
        .bind(filter.status)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Update a customer. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist
    /// for this tenant.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: CustomerId,
        input: &UpdateCustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, name, email, phone, status, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a customer. Sales made to the customer are kept with the
    /// reference cleared.
    ///
    /// # Returns
    ///
    /// `true` if the customer was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, tenant: TenantId, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a customer exists for this tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, tenant: TenantId, id: CustomerId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant)
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}

//! Database operations for batches.
//!
//! Batch writes touch two rows (the batch and its product's on-hand
//! quantity) plus the activity log, so every mutating method here runs in
//! a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use stockroom_core::{BatchId, ProductId, TenantId};

use super::RepositoryError;
use crate::models::batch::{Batch, BatchFilter, CreateBatchInput, UpdateBatchInput};

/// Internal row type for batch queries.
#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    id: i32,
    tenant_id: i32,
    product_id: i32,
    batch_number: String,
    quantity: i32,
    received_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
        Self {
            id: BatchId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            product_id: ProductId::new(row.product_id),
            batch_number: row.batch_number,
            quantity: row.quantity,
            received_date: row.received_date,
            expiry_date: row.expiry_date,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

const BATCH_COLUMNS: &str = "id, tenant_id, product_id, batch_number, quantity, received_date, \
     expiry_date, notes, created_at";

/// Repository for batch database operations.
pub struct BatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BatchRepository<'a> {
    /// Create a new batch repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Receive a batch: insert the batch row and increment the product's
    /// on-hand quantity atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist
    /// for this tenant; the transaction rolls back.
    pub async fn create_with_stock(
        &self,
        tenant: TenantId,
        input: &CreateBatchInput,
    ) -> Result<Batch, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE products SET quantity = quantity + $3, updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant)
        .bind(input.product_id)
        .bind(input.quantity)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query_as::<_, BatchRow>(
            r"
            INSERT INTO batches (
                tenant_id, product_id, batch_number, quantity,
                received_date, expiry_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tenant_id, product_id, batch_number, quantity,
                      received_date, expiry_date, notes, created_at
            ",
        )
        .bind(tenant)
        .bind(input.product_id)
        .bind(&input.batch_number)
        .bind(input.quantity)
        .bind(input.received_date)
        .bind(input.expiry_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'batch', $2, 'create', $3)",
        )
        .bind(tenant)
        .bind(row.id)
        .bind(format!(
            "Received batch {} ({} units)",
            row.batch_number, row.quantity
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get a batch by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        tenant: TenantId,
        id: BatchId,
    ) -> Result<Option<Batch>, RepositoryError> {
        let row = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List batches with filtering and pagination, oldest received first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &BatchFilter,
    ) -> Result<Vec<Batch>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, BatchRow>(&format!(
            r"
            SELECT {BATCH_COLUMNS}
            FROM batches
            WHERE tenant_id = $1
                AND ($2::int IS NULL OR product_id = $2)
                AND ($3::date IS NULL OR received_date >= $3)
                AND ($4::date IS NULL OR received_date <= $4)
            ORDER BY received_date ASC, id ASC
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(tenant)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count batches matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &BatchFilter,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM batches
            WHERE tenant_id = $1
                AND ($2::int IS NULL OR product_id = $2)
                AND ($3::date IS NULL OR received_date >= $3)
                AND ($4::date IS NULL OR received_date <= $4)
            ",
        )
        .bind(tenant)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Correct a batch record. A quantity correction adjusts the product's
    /// on-hand stock by the delta, atomically with the batch update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the batch doesn't exist for
    /// this tenant, `RepositoryError::Conflict` if the correction would
    /// drive the product's stock negative.
    pub async fn update_with_stock(
        &self,
        tenant: TenantId,
        id: BatchId,
        input: &UpdateBatchInput,
    ) -> Result<Batch, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE tenant_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(new_quantity) = input.quantity {
            let delta = new_quantity - current.quantity;
            if delta != 0 {
                let updated = sqlx::query(
                    "UPDATE products SET quantity = quantity + $3, updated_at = NOW() \
                     WHERE tenant_id = $1 AND id = $2 AND quantity + $3 >= 0",
                )
                .bind(tenant)
                .bind(current.product_id)
                .bind(delta)
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    return Err(RepositoryError::Conflict(
                        "Correction would make stock negative".to_string(),
                    ));
                }
            }
        }

        let row = sqlx::query_as::<_, BatchRow>(
            r"
            UPDATE batches
            SET batch_number = COALESCE($3, batch_number),
                quantity = COALESCE($4, quantity),
                expiry_date = COALESCE($5, expiry_date),
                notes = COALESCE($6, notes)
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, product_id, batch_number, quantity,
                      received_date, expiry_date, notes, created_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(&input.batch_number)
        .bind(input.quantity)
        .bind(input.expiry_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'batch', $2, 'update', $3)",
        )
        .bind(tenant)
        .bind(row.id)
        .bind(format!("Corrected batch {}", row.batch_number))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a batch record and back out its units from the product's
    /// on-hand quantity, atomically.
    ///
    /// # Returns
    ///
    /// `true` if the batch was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if backing out the units would
    /// drive the product's stock negative.
    pub async fn delete_with_stock(
        &self,
        tenant: TenantId,
        id: BatchId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE tenant_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(false);
        };

        let updated = sqlx::query(
            "UPDATE products SET quantity = quantity - $3, updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND quantity >= $3",
        )
        .bind(tenant)
        .bind(current.product_id)
        .bind(current.quantity)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "Removing batch would make stock negative".to_string(),
            ));
        }

        sqlx::query("DELETE FROM batches WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'batch', $2, 'delete', $3)",
        )
        .bind(tenant)
        .bind(current.id)
        .bind(format!(
            "Removed batch {} ({} units backed out)",
            current.batch_number, current.quantity
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }
}

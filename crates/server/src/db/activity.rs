//! Database operations for the activity log.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{ActivityEntryId, TenantId};

use super::RepositoryError;
use crate::models::activity::{ActivityEntry, ActivityFilter};

/// Internal row type for activity queries.
#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: i32,
    tenant_id: i32,
    entity_type: String,
    entity_id: i32,
    action: String,
    detail: String,
    created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityEntry {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: ActivityEntryId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            action: row.action,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

/// Repository for activity log database operations.
///
/// Multi-row mutations (batch intake, sales, purchase order receipts)
/// insert their entries inside their own transactions; this repository
/// covers standalone records and the feed queries.
pub struct ActivityLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityLogRepository<'a> {
    /// Create a new activity log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a single action.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        tenant: TenantId,
        entity_type: &str,
        entity_id: i32,
        action: &str,
        detail: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(tenant)
        .bind(entity_type)
        .bind(entity_id)
        .bind(action)
        .bind(detail)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List activity entries, newest first, with filtering and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let limit = filter.limit.unwrap_or(50);
        let offset = filter.offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, ActivityRow>(
            r"
            SELECT id, tenant_id, entity_type, entity_id, action, detail, created_at
            FROM activity_log
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR action = $2)
                AND ($3::text IS NULL OR entity_type = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(tenant)
        .bind(&filter.action)
        .bind(&filter.entity_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count activity entries matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &ActivityFilter,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM activity_log
            WHERE tenant_id = $1
                AND ($2::text IS NULL OR action = $2)
                AND ($3::text IS NULL OR entity_type = $3)
            ",
        )
        .bind(tenant)
        .bind(&filter.action)
        .bind(&filter.entity_type)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

//! Database operations for purchase orders.
//!
//! Receiving an order touches the order row, each product's on-hand
//! quantity, and the activity log, so receipt runs in a single
//! transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{ProductId, PurchaseOrderId, PurchaseOrderItemId, SupplierId, TenantId};

use super::RepositoryError;
use crate::models::purchase_order::{
    PurchaseOrder, PurchaseOrderFilter, PurchaseOrderItem, PurchaseOrderItemInput,
    PurchaseOrderStatus, PurchaseOrderWithItems,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for purchase order queries.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseOrderRow {
    id: i32,
    tenant_id: i32,
    supplier_id: i32,
    status: PurchaseOrderStatus,
    ordered_date: NaiveDate,
    expected_date: Option<NaiveDate>,
    received_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PurchaseOrderRow> for PurchaseOrder {
    fn from(row: PurchaseOrderRow) -> Self {
        Self {
            id: PurchaseOrderId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            supplier_id: SupplierId::new(row.supplier_id),
            status: row.status,
            ordered_date: row.ordered_date,
            expected_date: row.expected_date,
            received_at: row.received_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for purchase order item queries.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseOrderItemRow {
    id: i32,
    purchase_order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_cost: Decimal,
}

impl From<PurchaseOrderItemRow> for PurchaseOrderItem {
    fn from(row: PurchaseOrderItemRow) -> Self {
        Self {
            id: PurchaseOrderItemId::new(row.id),
            purchase_order_id: PurchaseOrderId::new(row.purchase_order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit_cost: row.unit_cost,
        }
    }
}

const ORDER_COLUMNS: &str = "id, tenant_id, supplier_id, status, ordered_date, expected_date, \
     received_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, purchase_order_id, product_id, quantity, unit_cost";

// =============================================================================
// Repository
// =============================================================================

/// Repository for purchase order database operations.
pub struct PurchaseOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseOrderRepository<'a> {
    /// Create a new purchase order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a draft purchase order with its line items atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; the
    /// transaction rolls back.
    pub async fn create_with_items(
        &self,
        tenant: TenantId,
        supplier_id: SupplierId,
        ordered_date: NaiveDate,
        expected_date: Option<NaiveDate>,
        items: &[PurchaseOrderItemInput],
    ) -> Result<PurchaseOrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, PurchaseOrderRow>(
            r"
            INSERT INTO purchase_orders (tenant_id, supplier_id, ordered_date, expected_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, supplier_id, status, ordered_date, expected_date,
                      received_at, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(supplier_id)
        .bind(ordered_date)
        .bind(expected_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut item_rows = Vec::with_capacity(items.len());
        for item in items {
            let item_row = sqlx::query_as::<_, PurchaseOrderItemRow>(
                r"
                INSERT INTO purchase_order_items (purchase_order_id, product_id, quantity, unit_cost)
                VALUES ($1, $2, $3, $4)
                RETURNING id, purchase_order_id, product_id, quantity, unit_cost
                ",
            )
            .bind(order_row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_cost)
            .fetch_one(&mut *tx)
            .await?;

            item_rows.push(item_row);
        }

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'purchase_order', $2, 'create', $3)",
        )
        .bind(tenant)
        .bind(order_row.id)
        .bind(format!(
            "Created purchase order with {} item(s)",
            item_rows.len()
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOrderWithItems {
            order: order_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        })
    }

    /// Get a purchase order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        tenant: TenantId,
        id: PurchaseOrderId,
    ) -> Result<Option<PurchaseOrderWithItems>, RepositoryError> {
        let Some(order_row) = sqlx::query_as::<_, PurchaseOrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, PurchaseOrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM purchase_order_items \
             WHERE purchase_order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(PurchaseOrderWithItems {
            order: order_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        }))
    }

    /// List purchase orders with filtering and pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &PurchaseOrderFilter,
    ) -> Result<Vec<PurchaseOrder>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, PurchaseOrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM purchase_orders
            WHERE tenant_id = $1
                AND ($2::purchase_order_status IS NULL OR status = $2)
                AND ($3::int IS NULL OR supplier_id = $3)
            ORDER BY ordered_date DESC, id DESC
            LIMIT $4 OFFSET $5
            "
        ))
        .bind(tenant)
        .bind(filter.status)
        .bind(filter.supplier_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count purchase orders matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &PurchaseOrderFilter,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM purchase_orders
            WHERE tenant_id = $1
                AND ($2::purchase_order_status IS NULL OR status = $2)
                AND ($3::int IS NULL OR supplier_id = $3)
            ",
        )
        .bind(tenant)
        .bind(filter.status)
        .bind(filter.supplier_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Move a draft order to `ordered`, or an unreceived order to
    /// `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist for
    /// this tenant or the transition isn't allowed from its current
    /// status.
    pub async fn transition(
        &self,
        tenant: TenantId,
        id: PurchaseOrderId,
        to: PurchaseOrderStatus,
    ) -> Result<PurchaseOrder, RepositoryError> {
        let allowed_from: &[PurchaseOrderStatus] = match to {
            PurchaseOrderStatus::Ordered => &[PurchaseOrderStatus::Draft],
            PurchaseOrderStatus::Cancelled => {
                &[PurchaseOrderStatus::Draft, PurchaseOrderStatus::Ordered]
            }
            // Receipt adjusts stock and must go through `receive`
            PurchaseOrderStatus::Draft | PurchaseOrderStatus::Received => &[],
        };

        let row = sqlx::query_as::<_, PurchaseOrderRow>(
            r"
            UPDATE purchase_orders
            SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2 AND status = ANY($4)
            RETURNING id, tenant_id, supplier_id, status, ordered_date, expected_date,
                      received_at, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(to)
        .bind(allowed_from)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Receive an order: mark it received and increment each ordered
    /// product's on-hand quantity, all atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist for
    /// this tenant or isn't in a receivable status; the transaction rolls
    /// back.
    pub async fn receive(
        &self,
        tenant: TenantId,
        id: PurchaseOrderId,
    ) -> Result<PurchaseOrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, PurchaseOrderRow>(
            r"
            UPDATE purchase_orders
            SET status = 'received', received_at = NOW(), updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2 AND status IN ('draft', 'ordered')
            RETURNING id, tenant_id, supplier_id, status, ordered_date, expected_date,
                      received_at, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let item_rows = sqlx::query_as::<_, PurchaseOrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM purchase_order_items \
             WHERE purchase_order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_row.id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &item_rows {
            sqlx::query(
                "UPDATE products SET quantity = quantity + $3, updated_at = NOW() \
                 WHERE tenant_id = $1 AND id = $2",
            )
            .bind(tenant)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'purchase_order', $2, 'receive', $3)",
        )
        .bind(tenant)
        .bind(order_row.id)
        .bind(format!(
            "Received purchase order ({} line item(s) into stock)",
            item_rows.len()
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOrderWithItems {
            order: order_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        })
    }
}

//! Database operations for sales, including the aggregates the analytics
//! engine reads through.
//!
//! Recording a sale touches the sale row, its line items, and each sold
//! product's on-hand quantity, so it runs in a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{CustomerId, ProductId, SaleId, SaleItemId, TenantId};

use super::RepositoryError;
use crate::models::analytics::DateRange;
use crate::models::sale::{Sale, SaleItem, SaleWithItems};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for sale queries.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    tenant_id: i32,
    customer_id: Option<i32>,
    sale_date: NaiveDate,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: SaleId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            customer_id: row.customer_id.map(CustomerId::new),
            sale_date: row.sale_date,
            total_amount: row.total_amount,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for sale item queries.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: i32,
    sale_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        Self {
            id: SaleItemId::new(row.id),
            sale_id: SaleId::new(row.sale_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Internal row type for the sales aggregate.
#[derive(Debug, sqlx::FromRow)]
struct SalesTotalsRow {
    total_sales: i64,
    total_revenue: Decimal,
}

/// A priced line item ready to be written.
#[derive(Debug, Clone)]
pub struct ResolvedSaleItem {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i32,
    /// Final price per unit.
    pub unit_price: Decimal,
}

/// Count and revenue over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesTotals {
    /// Number of sales.
    pub total_sales: i64,
    /// Sum of sale totals.
    pub total_revenue: Decimal,
}

const SALE_COLUMNS: &str = "id, tenant_id, customer_id, sale_date, total_amount, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a sale: insert the sale and its items and decrement each
    /// product's on-hand quantity, all atomically.
    ///
    /// Callers resolve prices and the total first; the per-product stock
    /// guard here is what holds under concurrent sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product lacks stock,
    /// `RepositoryError::NotFound` via the same guard if a product isn't
    /// owned by the tenant; the transaction rolls back either way.
    pub async fn create_with_items(
        &self,
        tenant: TenantId,
        customer_id: Option<CustomerId>,
        sale_date: NaiveDate,
        items: &[ResolvedSaleItem],
        total_amount: Decimal,
    ) -> Result<SaleWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sale_row = sqlx::query_as::<_, SaleRow>(
            r"
            INSERT INTO sales (tenant_id, customer_id, sale_date, total_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, customer_id, sale_date, total_amount, created_at
            ",
        )
        .bind(tenant)
        .bind(customer_id)
        .bind(sale_date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let mut item_rows = Vec::with_capacity(items.len());
        for item in items {
            let updated = sqlx::query(
                "UPDATE products SET quantity = quantity - $3, updated_at = NOW() \
                 WHERE tenant_id = $1 AND id = $2 AND quantity >= $3",
            )
            .bind(tenant)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for product {}",
                    item.product_id
                )));
            }

            let item_row = sqlx::query_as::<_, SaleItemRow>(
                r"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                RETURNING id, sale_id, product_id, quantity, unit_price
                ",
            )
            .bind(sale_row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await?;

            item_rows.push(item_row);
        }

        sqlx::query(
            "INSERT INTO activity_log (tenant_id, entity_type, entity_id, action, detail) \
             VALUES ($1, 'sale', $2, 'create', $3)",
        )
        .bind(tenant)
        .bind(sale_row.id)
        .bind(format!(
            "Recorded sale of {} item(s) totaling {}",
            item_rows.len(),
            total_amount
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SaleWithItems {
            sale: sale_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        })
    }

    /// Get a sale with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        tenant: TenantId,
        id: SaleId,
    ) -> Result<Option<SaleWithItems>, RepositoryError> {
        let Some(sale_row) = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT id, sale_id, product_id, quantity, unit_price \
             FROM sale_items WHERE sale_id = $1 ORDER BY id ASC",
        )
        .bind(sale_row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(SaleWithItems {
            sale: sale_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        }))
    }

    /// List sales in a date range, newest first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        range: DateRange,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            r"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE tenant_id = $1
                AND ($2::date IS NULL OR sale_date >= $2)
                AND ($3::date IS NULL OR sale_date <= $3)
            ORDER BY sale_date DESC, id DESC
            LIMIT $4 OFFSET $5
            "
        ))
        .bind(tenant)
        .bind(range.start)
        .bind(range.end)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count sales in a date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, tenant: TenantId, range: DateRange) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM sales
            WHERE tenant_id = $1
                AND ($2::date IS NULL OR sale_date >= $2)
                AND ($3::date IS NULL OR sale_date <= $3)
            ",
        )
        .bind(tenant)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Count and revenue over an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_totals(
        &self,
        tenant: TenantId,
        range: DateRange,
    ) -> Result<SalesTotals, RepositoryError> {
        let row = sqlx::query_as::<_, SalesTotalsRow>(
            r"
            SELECT COUNT(*) AS total_sales,
                   COALESCE(SUM(total_amount), 0) AS total_revenue
            FROM sales
            WHERE tenant_id = $1
                AND ($2::date IS NULL OR sale_date >= $2)
                AND ($3::date IS NULL OR sale_date <= $3)
            ",
        )
        .bind(tenant)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(self.pool)
        .await?;

        Ok(SalesTotals {
            total_sales: row.total_sales,
            total_revenue: row.total_revenue,
        })
    }

    /// The most recent sales in a range, newest first, with their line
    /// items attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_with_items(
        &self,
        tenant: TenantId,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<SaleWithItems>, RepositoryError> {
        let sale_rows = sqlx::query_as::<_, SaleRow>(&format!(
            r"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE tenant_id = $1
                AND ($2::date IS NULL OR sale_date >= $2)
                AND ($3::date IS NULL OR sale_date <= $3)
            ORDER BY sale_date DESC, id DESC
            LIMIT $4
            "
        ))
        .bind(tenant)
        .bind(range.start)
        .bind(range.end)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        if sale_rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = sale_rows.iter().map(|s| s.id).collect();
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT id, sale_id, product_id, quantity, unit_price \
             FROM sale_items WHERE sale_id = ANY($1) ORDER BY id ASC",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut sales: Vec<SaleWithItems> = sale_rows
            .into_iter()
            .map(|row| SaleWithItems {
                sale: row.into(),
                items: Vec::new(),
            })
            .collect();

        for item_row in item_rows {
            let item: SaleItem = item_row.into();
            if let Some(sale) = sales.iter_mut().find(|s| s.sale.id == item.sale_id) {
                sale.items.push(item);
            }
        }

        Ok(sales)
    }
}

//! Database operations for products, including the aggregate queries the
//! analytics and alert engines read through.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{CategoryId, ProductId, SupplierId, TenantId};

use super::RepositoryError;
use crate::models::product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    tenant_id: i32,
    name: String,
    sku: Option<String>,
    manufacturer: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    low_stock_threshold: Option<i32>,
    category_id: Option<i32>,
    supplier_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            name: row.name,
            sku: row.sku,
            manufacturer: row.manufacturer,
            quantity: row.quantity,
            unit_price: row.unit_price,
            low_stock_threshold: row.low_stock_threshold,
            category_id: row.category_id.map(CategoryId::new),
            supplier_id: row.supplier_id.map(SupplierId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the one-pass inventory aggregate.
#[derive(Debug, sqlx::FromRow)]
struct InventoryTotalsRow {
    total_products: i64,
    total_value: Decimal,
    low_stock_count: i64,
    out_of_stock_count: i64,
}

/// Internal row type for per-category valuation.
#[derive(Debug, sqlx::FromRow)]
struct CategoryValueRow {
    category_id: Option<i32>,
    value: Decimal,
}

const PRODUCT_COLUMNS: &str = "id, tenant_id, name, sku, manufacturer, quantity, unit_price, \
     low_stock_threshold, category_id, supplier_id, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// One-pass inventory aggregate for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTotals {
    /// Number of products in the catalog.
    pub total_products: i64,
    /// Sum of unit price times quantity.
    pub total_value: Decimal,
    /// Products above zero but at or below their threshold.
    pub low_stock_count: i64,
    /// Products with zero quantity.
    pub out_of_stock_count: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is already taken
    /// within the tenant, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        tenant: TenantId,
        input: &CreateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (
                tenant_id, name, sku, manufacturer, quantity, unit_price,
                low_stock_threshold, category_id, supplier_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, tenant_id, name, sku, manufacturer, quantity, unit_price,
                      low_stock_threshold, category_id, supplier_id, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.manufacturer)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.low_stock_threshold)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("products_tenant_sku_idx")
            {
                return RepositoryError::Conflict("SKU already in use".to_string());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        tenant: TenantId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List products with filtering and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        tenant: TenantId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE tenant_id = $1
                AND ($2::text IS NULL
                     OR name ILIKE $2 OR sku ILIKE $2 OR manufacturer ILIKE $2)
                AND ($3::int IS NULL OR category_id = $3)
                AND ($4::int IS NULL OR supplier_id = $4)
                AND (NOT $5::bool OR quantity = 0
                     OR (low_stock_threshold IS NOT NULL AND quantity <= low_stock_threshold))
            ORDER BY name ASC, id ASC
            LIMIT $6 OFFSET $7
            "
        ))
        .bind(tenant)
        .bind(search)
        .bind(filter.category_id)
        .bind(filter.supplier_id)
        .bind(filter.alerting_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count products matching a filter (for pagination).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        tenant: TenantId,
        filter: &ProductFilter,
    ) -> Result<i64, RepositoryError> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM products
            WHERE tenant_id = $1
                AND ($2::text IS NULL
                     OR name ILIKE $2 OR sku ILIKE $2 OR manufacturer ILIKE $2)
                AND ($3::int IS NULL OR category_id = $3)
                AND ($4::int IS NULL OR supplier_id = $4)
                AND (NOT $5::bool OR quantity = 0
                     OR (low_stock_threshold IS NOT NULL AND quantity <= low_stock_threshold))
            ",
        )
        .bind(tenant)
        .bind(search)
        .bind(filter.category_id)
        .bind(filter.supplier_id)
        .bind(filter.alerting_only)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Update a product. `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist for
    /// this tenant, `RepositoryError::Conflict` on a duplicate SKU.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = COALESCE($3, name),
                sku = COALESCE($4, sku),
                manufacturer = COALESCE($5, manufacturer),
                quantity = COALESCE($6, quantity),
                unit_price = COALESCE($7, unit_price),
                category_id = COALESCE($8, category_id),
                supplier_id = COALESCE($9, supplier_id),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, name, sku, manufacturer, quantity, unit_price,
                      low_stock_threshold, category_id, supplier_id, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.manufacturer)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("products_tenant_sku_idx")
            {
                return RepositoryError::Conflict("SKU already in use".to_string());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Set or clear a product's low stock threshold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist for
    /// this tenant.
    pub async fn set_threshold(
        &self,
        tenant: TenantId,
        id: ProductId,
        threshold: Option<i32>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET low_stock_threshold = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, name, sku, manufacturer, quantity, unit_price,
                      low_stock_threshold, category_id, supplier_id, created_at, updated_at
            ",
        )
        .bind(tenant)
        .bind(id)
        .bind(threshold)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// Fails with `Conflict` while historical sales still reference the
    /// product (RESTRICT foreign key): those rows are the audit trail.
    ///
    /// # Returns
    ///
    /// `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, tenant: TenantId, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "Product is referenced by sales or purchase orders".to_string(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a product exists for this tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, tenant: TenantId, id: ProductId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant)
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Catalog-wide counts and valuation in one pass.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn inventory_totals(
        &self,
        tenant: TenantId,
    ) -> Result<InventoryTotals, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryTotalsRow>(
            r"
            SELECT
                COUNT(*) AS total_products,
                COALESCE(SUM(unit_price * quantity), 0) AS total_value,
                COUNT(*) FILTER (
                    WHERE low_stock_threshold IS NOT NULL
                        AND quantity > 0
                        AND quantity <= low_stock_threshold
                ) AS low_stock_count,
                COUNT(*) FILTER (WHERE quantity = 0) AS out_of_stock_count
            FROM products
            WHERE tenant_id = $1
            ",
        )
        .bind(tenant)
        .fetch_one(self.pool)
        .await?;

        Ok(InventoryTotals {
            total_products: row.total_products,
            total_value: row.total_value,
            low_stock_count: row.low_stock_count,
            out_of_stock_count: row.out_of_stock_count,
        })
    }

    /// Inventory value grouped by category. `None` means uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn value_by_category(
        &self,
        tenant: TenantId,
    ) -> Result<Vec<(Option<CategoryId>, Decimal)>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryValueRow>(
            r"
            SELECT category_id, COALESCE(SUM(unit_price * quantity), 0) AS value
            FROM products
            WHERE tenant_id = $1
            GROUP BY category_id
            ",
        )
        .bind(tenant)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.category_id.map(CategoryId::new), r.value))
            .collect())
    }

    /// Products currently alerting: out of stock, or at or below their
    /// threshold. Ordered by quantity then name so pagination and alert
    /// feeds are deterministic.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn alerting(&self, tenant: TenantId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE tenant_id = $1
                AND (quantity = 0
                     OR (low_stock_threshold IS NOT NULL AND quantity <= low_stock_threshold))
            ORDER BY quantity ASC, name ASC
            "
        ))
        .bind(tenant)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

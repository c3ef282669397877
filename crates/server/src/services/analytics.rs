//! Analytics engine: inventory valuation and sales aggregates.
//!
//! Reads go through the result cache; on a miss the gateway's named
//! aggregate queries run and the raw rows are shaped here. Monetary
//! values stay `Decimal` from the NUMERIC columns to the response DTOs.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{CategoryId, TenantId};

use crate::cache::{self, ResultCache, tags, ttl};
use crate::db::{CategoryRepository, ProductRepository, RepositoryError, SaleRepository};
use crate::models::analytics::{DateRange, InventoryAnalytics, SalesAnalytics, UNCATEGORIZED};

/// How many recent sales ride along with the sales aggregates.
const RECENT_SALES_LIMIT: i64 = 10;

/// Computes tenant-scoped analytics snapshots.
pub struct AnalyticsService<'a> {
    pool: &'a PgPool,
    cache: &'a ResultCache,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a ResultCache) -> Self {
        Self { pool, cache }
    }

    /// Inventory valuation snapshot for a tenant: counts, total value,
    /// and value per category (uncategorized products roll up under
    /// "Uncategorized").
    ///
    /// Cached for two minutes under the analytics, products, and
    /// categories tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if an underlying query fails.
    pub async fn inventory_analytics(
        &self,
        tenant: TenantId,
    ) -> Result<InventoryAnalytics, RepositoryError> {
        let key = cache::key("inventory_analytics", tenant, "");
        let tag_set = vec![
            cache::scoped(tags::ANALYTICS, tenant),
            cache::scoped(tags::PRODUCTS, tenant),
            cache::scoped(tags::CATEGORIES, tenant),
        ];

        self.cache
            .get_or_compute(&key, &tag_set, ttl::ANALYTICS, || {
                compute_inventory_analytics(self.pool, tenant)
            })
            .await
    }

    /// Sales aggregates over an optional inclusive date range: count,
    /// revenue, and the most recent sales with their line items. An empty
    /// range yields zeros and an empty list, never null.
    ///
    /// Cached for two minutes under the analytics and sales tags, keyed
    /// by the range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if an underlying query fails.
    pub async fn sales_analytics(
        &self,
        tenant: TenantId,
        range: DateRange,
    ) -> Result<SalesAnalytics, RepositoryError> {
        let params = format!(
            "{}..{}",
            range.start.map(|d| d.to_string()).unwrap_or_default(),
            range.end.map(|d| d.to_string()).unwrap_or_default(),
        );
        let key = cache::key("sales_analytics", tenant, &params);
        let tag_set = vec![
            cache::scoped(tags::ANALYTICS, tenant),
            cache::scoped(tags::SALES, tenant),
        ];

        self.cache
            .get_or_compute(&key, &tag_set, ttl::ANALYTICS, || {
                compute_sales_analytics(self.pool, tenant, range)
            })
            .await
    }
}

async fn compute_inventory_analytics(
    pool: &PgPool,
    tenant: TenantId,
) -> Result<InventoryAnalytics, RepositoryError> {
    let products = ProductRepository::new(pool);
    let categories = CategoryRepository::new(pool);

    // Totals and the category grouping are independent reads
    let (totals, by_category, names) = tokio::try_join!(
        products.inventory_totals(tenant),
        products.value_by_category(tenant),
        categories.list(tenant),
    )?;

    let value_by_category = label_category_values(
        by_category,
        names.into_iter().map(|c| (c.id, c.name)).collect(),
    );

    Ok(InventoryAnalytics {
        total_products: totals.total_products,
        total_value: totals.total_value,
        low_stock_count: totals.low_stock_count,
        out_of_stock_count: totals.out_of_stock_count,
        value_by_category,
    })
}

async fn compute_sales_analytics(
    pool: &PgPool,
    tenant: TenantId,
    range: DateRange,
) -> Result<SalesAnalytics, RepositoryError> {
    let sales = SaleRepository::new(pool);

    let (totals, recent) = tokio::try_join!(
        sales.sales_totals(tenant, range),
        sales.recent_with_items(tenant, range, RECENT_SALES_LIMIT),
    )?;

    Ok(SalesAnalytics {
        total_sales: totals.total_sales,
        total_revenue: totals.total_revenue,
        recent,
    })
}

/// Join grouped values against category names. Unmatched or null category
/// IDs map to the "Uncategorized" label; groups sharing a label merge.
fn label_category_values(
    grouped: Vec<(Option<CategoryId>, Decimal)>,
    names: BTreeMap<CategoryId, String>,
) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for (category_id, value) in grouped {
        let label = category_id
            .and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *out.entry(label).or_insert(Decimal::ZERO) += value;
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn names(pairs: &[(i32, &str)]) -> BTreeMap<CategoryId, String> {
        pairs
            .iter()
            .map(|(id, name)| (CategoryId::new(*id), (*name).to_string()))
            .collect()
    }

    #[test]
    fn test_label_category_values_joins_names() {
        let grouped = vec![
            (Some(CategoryId::new(1)), dec!(100.50)),
            (Some(CategoryId::new(2)), dec!(20.00)),
        ];
        let labeled = label_category_values(grouped, names(&[(1, "Tools"), (2, "Paint")]));

        assert_eq!(labeled.get("Tools"), Some(&dec!(100.50)));
        assert_eq!(labeled.get("Paint"), Some(&dec!(20.00)));
    }

    #[test]
    fn test_null_category_becomes_uncategorized() {
        let grouped = vec![(None, dec!(42.00))];
        let labeled = label_category_values(grouped, names(&[(1, "Tools")]));

        assert_eq!(labeled.get(UNCATEGORIZED), Some(&dec!(42.00)));
    }

    #[test]
    fn test_dangling_category_id_falls_back_to_uncategorized() {
        // Group references a category that no longer has a name row
        let grouped = vec![(Some(CategoryId::new(9)), dec!(10.00)), (None, dec!(5.00))];
        let labeled = label_category_values(grouped, names(&[(1, "Tools")]));

        // Both merge under the fallback label rather than collapsing
        // one another
        assert_eq!(labeled.get(UNCATEGORIZED), Some(&dec!(15.00)));
        assert_eq!(labeled.len(), 1);
    }

    #[test]
    fn test_category_values_sum_to_total() {
        let grouped = vec![
            (Some(CategoryId::new(1)), dec!(100.50)),
            (Some(CategoryId::new(2)), dec!(20.25)),
            (None, dec!(4.25)),
        ];
        let total: Decimal = grouped.iter().map(|(_, v)| *v).sum();
        let labeled = label_category_values(grouped, names(&[(1, "Tools"), (2, "Paint")]));

        let sum: Decimal = labeled.values().copied().sum();
        assert_eq!(sum, total);
        assert_eq!(sum, dec!(125.00));
    }

    #[test]
    fn test_empty_grouping_yields_empty_map() {
        let labeled = label_category_values(Vec::new(), BTreeMap::new());
        assert!(labeled.is_empty());
    }
}

//! Derived analytics models.
//!
//! Snapshots are computed from current rows on cache miss; none of these
//! types is ever persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sale::SaleWithItems;

/// Label used for products without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// An inclusive date range. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// True when neither bound is set.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Inventory valuation snapshot for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAnalytics {
    /// Number of products in the catalog.
    pub total_products: i64,
    /// Sum of unit price times quantity across all products.
    pub total_value: Decimal,
    /// Products above zero but at or below their threshold.
    pub low_stock_count: i64,
    /// Products with zero quantity.
    pub out_of_stock_count: i64,
    /// Inventory value per category name; uncategorized products roll up
    /// under [`UNCATEGORIZED`].
    pub value_by_category: BTreeMap<String, Decimal>,
}

impl InventoryAnalytics {
    /// The snapshot for a tenant with no products.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_products: 0,
            total_value: Decimal::ZERO,
            low_stock_count: 0,
            out_of_stock_count: 0,
            value_by_category: BTreeMap::new(),
        }
    }
}

/// Sales aggregates over an optional date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesAnalytics {
    /// Number of sales in range.
    pub total_sales: i64,
    /// Sum of sale totals in range.
    pub total_revenue: Decimal,
    /// Most recent sales in range, newest first, with line items.
    pub recent: Vec<SaleWithItems>,
}

impl SalesAnalytics {
    /// The aggregates for a range with no sales.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_sales: 0,
            total_revenue: Decimal::ZERO,
            recent: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inventory_snapshot_is_all_zeros() {
        let snapshot = InventoryAnalytics::empty();
        assert_eq!(snapshot.total_products, 0);
        assert_eq!(snapshot.total_value, Decimal::ZERO);
        assert_eq!(snapshot.low_stock_count, 0);
        assert_eq!(snapshot.out_of_stock_count, 0);
        assert!(snapshot.value_by_category.is_empty());
    }

    #[test]
    fn test_empty_sales_has_empty_recent_list() {
        let analytics = SalesAnalytics::empty();
        assert_eq!(analytics.total_sales, 0);
        assert_eq!(analytics.total_revenue, Decimal::ZERO);
        assert!(analytics.recent.is_empty());
    }

    #[test]
    fn test_date_range_openness() {
        assert!(DateRange::default().is_open());

        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2026, 1, 1),
            end: None,
        };
        assert!(!range.is_open());
    }
}

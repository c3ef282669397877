//! Derived stock alert models.
//!
//! Alerts are never persisted: they are computed per request from current
//! product rows. Classification lives here as pure functions so the rules
//! are testable without a database.

use serde::{Deserialize, Serialize};

use stockroom_core::ProductId;

use super::product::Product;

/// Default target stock for products without a configured threshold.
const DEFAULT_TARGET_STOCK: i32 = 10;

/// Default minimum order quantity for products without a configured threshold.
const DEFAULT_ORDER_FLOOR: i32 = 5;

/// Kind of stock alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Quantity is exactly zero.
    OutOfStock,
    /// Quantity is above zero but at or below the configured threshold.
    LowStock,
    /// A reorder is suggested for a product with no configured threshold.
    RestockNeeded,
}

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Out of stock, or at or below half the threshold.
    Critical,
    /// Low, but above half the threshold.
    Warning,
    /// Advisory only.
    Info,
}

/// A stock alert for a single product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    /// Product the alert is for.
    pub product_id: ProductId,
    /// Product name, for display.
    pub product_name: String,
    /// Units currently on hand.
    pub current_stock: i32,
    /// The product's low stock threshold, if configured.
    pub threshold: Option<i32>,
    /// Kind of alert.
    pub alert_type: AlertType,
    /// How urgent the alert is.
    pub severity: AlertSeverity,
    /// Human-readable message.
    pub message: String,
}

impl StockAlert {
    /// Classify a product into an alert, or `None` if its stock is healthy.
    ///
    /// Rules:
    /// - quantity == 0 → out of stock, critical
    /// - threshold set and 0 < quantity <= threshold → low stock;
    ///   critical when quantity is at or below half the threshold
    ///   (computed as `2 * quantity <= threshold`, exact at the boundary)
    #[must_use]
    pub fn evaluate(product: &Product) -> Option<Self> {
        let (alert_type, severity) = classify(product.quantity, product.low_stock_threshold)?;

        let message = match alert_type {
            AlertType::OutOfStock => format!("{} is out of stock", product.name),
            AlertType::LowStock | AlertType::RestockNeeded => format!(
                "{} is low: {} left (threshold {})",
                product.name,
                product.quantity,
                product.low_stock_threshold.unwrap_or(0),
            ),
        };

        Some(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            current_stock: product.quantity,
            threshold: product.low_stock_threshold,
            alert_type,
            severity,
            message,
        })
    }
}

/// Classify a stock level against an optional threshold.
#[must_use]
pub fn classify(quantity: i32, threshold: Option<i32>) -> Option<(AlertType, AlertSeverity)> {
    if quantity == 0 {
        return Some((AlertType::OutOfStock, AlertSeverity::Critical));
    }

    let threshold = threshold?;
    if quantity > 0 && quantity <= threshold {
        let severity = if 2 * quantity <= threshold {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        return Some((AlertType::LowStock, severity));
    }

    None
}

/// Counts over a set of alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    /// All alerts.
    pub total_alerts: i64,
    /// Out-of-stock alerts plus low-stock alerts at or below half threshold.
    pub critical_alerts: i64,
    /// Everything else.
    pub warning_alerts: i64,
    /// Products with zero quantity.
    pub out_of_stock: i64,
    /// Products above zero but at or below their threshold.
    pub low_stock: i64,
}

impl AlertSummary {
    /// Summarize a classified alert list.
    #[must_use]
    pub fn from_alerts(alerts: &[StockAlert]) -> Self {
        let total = alerts.len() as i64;
        let out_of_stock = alerts
            .iter()
            .filter(|a| a.alert_type == AlertType::OutOfStock)
            .count() as i64;
        let low_stock = alerts
            .iter()
            .filter(|a| a.alert_type == AlertType::LowStock)
            .count() as i64;
        let critical = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count() as i64;

        Self {
            total_alerts: total,
            critical_alerts: critical,
            warning_alerts: total - critical,
            out_of_stock,
            low_stock,
        }
    }
}

/// A suggested reorder for an alerting product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    /// Product to reorder.
    pub product_id: ProductId,
    /// Product name, for display.
    pub product_name: String,
    /// Units currently on hand.
    pub current_stock: i32,
    /// The product's low stock threshold, if configured.
    pub threshold: Option<i32>,
    /// Stock level the order should bring the product up to.
    pub target_stock: i32,
    /// Suggested order quantity.
    pub recommended_order_quantity: i32,
    /// Rough days of stock left at the baseline consumption rate.
    pub estimated_days_remaining: i32,
    /// Alert classification backing the recommendation.
    pub alert_type: AlertType,
}

impl ReorderRecommendation {
    /// Build a recommendation for an alerting product.
    ///
    /// Target is twice the threshold (or 10 without one); the order
    /// quantity at least refills to target and never drops below the
    /// threshold (or 5 without one). Days remaining assume a fixed 7-day
    /// consumption baseline, not observed sales velocity.
    #[must_use]
    pub fn for_product(product: &Product) -> Option<Self> {
        let (alert_type, _) = classify(product.quantity, product.low_stock_threshold)?;

        let target_stock = product
            .low_stock_threshold
            .map_or(DEFAULT_TARGET_STOCK, |t| t * 2);
        let floor = product.low_stock_threshold.unwrap_or(DEFAULT_ORDER_FLOOR);
        let recommended_order_quantity = (target_stock - product.quantity).max(floor);

        let estimated_days_remaining = match product.low_stock_threshold {
            Some(threshold) if product.quantity > 0 && threshold > 0 => {
                product.quantity * 7 / threshold
            }
            _ => 0,
        };

        // Threshold-less products reorder on the default target/floor, so
        // their recommendations read as restock suggestions.
        let alert_type = if product.low_stock_threshold.is_none() {
            AlertType::RestockNeeded
        } else {
            alert_type
        };

        Some(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            current_stock: product.quantity,
            threshold: product.low_stock_threshold,
            target_stock,
            recommended_order_quantity,
            estimated_days_remaining,
            alert_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stockroom_core::TenantId;

    use super::*;

    fn product(quantity: i32, threshold: Option<i32>) -> Product {
        Product {
            id: ProductId::new(1),
            tenant_id: TenantId::new(1),
            name: "Widget".to_string(),
            sku: Some("WID-001".to_string()),
            manufacturer: None,
            quantity,
            unit_price: Decimal::new(999, 2),
            low_stock_threshold: threshold,
            category_id: None,
            supplier_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_out_of_stock_iff_zero_quantity() {
        let (alert_type, severity) = classify(0, None).unwrap();
        assert_eq!(alert_type, AlertType::OutOfStock);
        assert_eq!(severity, AlertSeverity::Critical);

        // Zero quantity wins even with a threshold configured
        let (alert_type, _) = classify(0, Some(10)).unwrap();
        assert_eq!(alert_type, AlertType::OutOfStock);

        // Non-zero quantity is never out of stock
        assert!(classify(1, None).is_none());
    }

    #[test]
    fn test_low_stock_iff_within_threshold() {
        assert!(matches!(
            classify(10, Some(10)),
            Some((AlertType::LowStock, _))
        ));
        assert!(matches!(
            classify(1, Some(10)),
            Some((AlertType::LowStock, _))
        ));

        // Above threshold is healthy
        assert!(classify(11, Some(10)).is_none());

        // No threshold, no low stock alert
        assert!(classify(1, None).is_none());
    }

    #[test]
    fn test_severity_boundary_at_half_threshold() {
        // 2 * 5 <= 10: exactly half is critical
        let (_, severity) = classify(5, Some(10)).unwrap();
        assert_eq!(severity, AlertSeverity::Critical);

        // Just above half is a warning
        let (_, severity) = classify(6, Some(10)).unwrap();
        assert_eq!(severity, AlertSeverity::Warning);

        // Odd thresholds round in favor of critical: 2 * 3 <= 7
        let (_, severity) = classify(3, Some(7)).unwrap();
        assert_eq!(severity, AlertSeverity::Critical);
        let (_, severity) = classify(4, Some(7)).unwrap();
        assert_eq!(severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_evaluate_healthy_product_is_none() {
        assert!(StockAlert::evaluate(&product(50, Some(10))).is_none());
        assert!(StockAlert::evaluate(&product(1, None)).is_none());
    }

    #[test]
    fn test_evaluate_messages() {
        let alert = StockAlert::evaluate(&product(0, None)).unwrap();
        assert_eq!(alert.message, "Widget is out of stock");

        let alert = StockAlert::evaluate(&product(5, Some(10))).unwrap();
        assert_eq!(alert.message, "Widget is low: 5 left (threshold 10)");
    }

    #[test]
    fn test_summary_counts() {
        let alerts: Vec<StockAlert> = [
            product(0, None),
            product(0, Some(8)),
            product(3, Some(10)),
            product(9, Some(10)),
        ]
        .iter()
        .filter_map(StockAlert::evaluate)
        .collect();

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.total_alerts, 4);
        assert_eq!(summary.out_of_stock, 2);
        assert_eq!(summary.low_stock, 2);
        // Two out-of-stock plus one low at 3/10 (at or below half)
        assert_eq!(summary.critical_alerts, 3);
        assert_eq!(summary.warning_alerts, 1);
    }

    #[test]
    fn test_reorder_formula() {
        // threshold 10, quantity 3: target 20, order max(17, 10) = 17,
        // days floor(3/10 * 7) = 2
        let rec = ReorderRecommendation::for_product(&product(3, Some(10))).unwrap();
        assert_eq!(rec.target_stock, 20);
        assert_eq!(rec.recommended_order_quantity, 17);
        assert_eq!(rec.estimated_days_remaining, 2);
        assert_eq!(rec.alert_type, AlertType::LowStock);
    }

    #[test]
    fn test_reorder_without_threshold() {
        let rec = ReorderRecommendation::for_product(&product(0, None)).unwrap();
        assert_eq!(rec.target_stock, 10);
        assert_eq!(rec.recommended_order_quantity, 10);
        assert_eq!(rec.estimated_days_remaining, 0);
        assert_eq!(rec.alert_type, AlertType::RestockNeeded);
    }

    #[test]
    fn test_reorder_floor_never_below_threshold() {
        // Nearly full but alerting: order at least the threshold
        let rec = ReorderRecommendation::for_product(&product(10, Some(10))).unwrap();
        assert_eq!(rec.target_stock, 20);
        assert_eq!(rec.recommended_order_quantity, 10);
        assert_eq!(rec.estimated_days_remaining, 7);
    }

    #[test]
    fn test_healthy_product_has_no_recommendation() {
        assert!(ReorderRecommendation::for_product(&product(100, Some(10))).is_none());
    }
}

//! Stock alert engine: low/out-of-stock feeds, summaries, and reorder
//! recommendations.
//!
//! Selection happens in the gateway (`ProductRepository::alerting`);
//! classification and the reorder arithmetic are pure functions on the
//! models so the invariants are unit-testable. Reads go through the
//! result cache; threshold changes follow the mutation-action contract.

use sqlx::PgPool;

use stockroom_core::{ProductId, TenantId};

use crate::cache::{self, ResultCache, tags, ttl};
use crate::db::{ActivityLogRepository, ProductRepository, RepositoryError};
use crate::models::alert::{AlertSummary, ReorderRecommendation, StockAlert};
use crate::services::actions::ActionResult;

/// Default planning horizon for reorder suggestions, in days.
pub const DEFAULT_DAYS_OF_STOCK: i32 = 30;

/// Computes tenant-scoped stock alerts.
pub struct StockAlertService<'a> {
    pool: &'a PgPool,
    cache: &'a ResultCache,
}

impl<'a> StockAlertService<'a> {
    /// Create a new stock alert service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a ResultCache) -> Self {
        Self { pool, cache }
    }

    /// All current alerts for a tenant, sorted by quantity then name so
    /// ordering is deterministic for pagination and tests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying query fails.
    pub async fn stock_alerts(&self, tenant: TenantId) -> Result<Vec<StockAlert>, RepositoryError> {
        let key = cache::key("stock_alerts", tenant, "");
        let tag_set = vec![
            cache::scoped(tags::ANALYTICS, tenant),
            cache::scoped(tags::PRODUCTS, tenant),
        ];

        self.cache
            .get_or_compute(&key, &tag_set, ttl::ANALYTICS, || async {
                let products = ProductRepository::new(self.pool).alerting(tenant).await?;
                Ok(products.iter().filter_map(StockAlert::evaluate).collect())
            })
            .await
    }

    /// Alert counts for a tenant's dashboard tiles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying query fails.
    pub async fn alert_summary(&self, tenant: TenantId) -> Result<AlertSummary, RepositoryError> {
        let alerts = self.stock_alerts(tenant).await?;
        Ok(AlertSummary::from_alerts(&alerts))
    }

    /// Reorder suggestions for every alerting product, most urgent first
    /// (ascending estimated days remaining).
    ///
    /// `days_of_stock` names the planning horizon the caller wants, but
    /// the estimate uses a fixed 7-day consumption baseline rather than
    /// observed sales velocity; the horizon is echoed back untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying query fails.
    pub async fn reorder_recommendations(
        &self,
        tenant: TenantId,
        days_of_stock: i32,
    ) -> Result<Vec<ReorderRecommendation>, RepositoryError> {
        let key = cache::key("reorder_recommendations", tenant, &days_of_stock.to_string());
        let tag_set = vec![
            cache::scoped(tags::ANALYTICS, tenant),
            cache::scoped(tags::PRODUCTS, tenant),
        ];

        self.cache
            .get_or_compute(&key, &tag_set, ttl::ANALYTICS, || async {
                let products = ProductRepository::new(self.pool).alerting(tenant).await?;
                let mut recommendations: Vec<ReorderRecommendation> = products
                    .iter()
                    .filter_map(ReorderRecommendation::for_product)
                    .collect();
                recommendations.sort_by(|a, b| {
                    a.estimated_days_remaining
                        .cmp(&b.estimated_days_remaining)
                        .then_with(|| a.product_name.cmp(&b.product_name))
                });
                Ok(recommendations)
            })
            .await
    }

    /// Set or clear a product's low stock threshold.
    ///
    /// Ownership-checked: the update is scoped to the tenant and a
    /// missing product fails as not found. Clearing the threshold leaves
    /// the product eligible for out-of-stock alerts only.
    pub async fn set_alert_threshold(
        &self,
        tenant: TenantId,
        product_id: ProductId,
        threshold: Option<i32>,
    ) -> ActionResult {
        if let Some(value) = threshold
            && value < 0
        {
            return ActionResult::invalid(
                "threshold",
                "Threshold must be zero or greater".to_string(),
            );
        }

        let products = ProductRepository::new(self.pool);
        let product = match products.set_threshold(tenant, product_id, threshold).await {
            Ok(product) => product,
            Err(RepositoryError::NotFound) => {
                return ActionResult::failed("Product not found".to_string());
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, product = %product_id, error = %e, "Failed to set threshold");
                return ActionResult::failed("Failed to update threshold".to_string());
            }
        };

        let detail = match threshold {
            Some(value) => format!("Set low stock threshold to {value} on {}", product.name),
            None => format!("Cleared low stock threshold on {}", product.name),
        };
        if let Err(e) = ActivityLogRepository::new(self.pool)
            .record(tenant, "product", product.id.as_i32(), "set_threshold", &detail)
            .await
        {
            tracing::warn!(tenant = %tenant, error = %e, "Failed to record threshold change");
        }

        // Invalidate only after the write has committed
        self.cache.invalidate_all(&[
            cache::scoped(tags::PRODUCTS, tenant),
            cache::scoped(tags::ANALYTICS, tenant),
            cache::scoped(tags::ACTIVITY_LOG, tenant),
        ]);

        ActionResult::ok(detail)
    }
}

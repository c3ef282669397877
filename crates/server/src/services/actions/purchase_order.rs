//! Purchase order mutation actions.

use chrono::Utc;
use sqlx::PgPool;

use stockroom_core::{PurchaseOrderId, TenantId};

use super::{ActionResult, FieldErrors, require_non_negative_amount, require_positive};
use crate::cache::{self, ResultCache, tags};
use crate::db::{ProductRepository, PurchaseOrderRepository, RepositoryError, SupplierRepository};
use crate::models::purchase_order::{CreatePurchaseOrderInput, PurchaseOrderStatus};

fn order_tags(tenant: TenantId) -> [String; 2] {
    [
        cache::scoped(tags::PURCHASE_ORDERS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

// Receipt moves units into stock, so valuation caches go too.
fn receipt_tags(tenant: TenantId) -> [String; 4] {
    [
        cache::scoped(tags::PURCHASE_ORDERS, tenant),
        cache::scoped(tags::PRODUCTS, tenant),
        cache::scoped(tags::ANALYTICS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a draft purchase order.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreatePurchaseOrderInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if input.items.is_empty() {
        errors.push("items", "An order needs at least one item".to_string());
    }
    for item in &input.items {
        require_positive(&mut errors, "items.quantity", item.quantity);
        require_non_negative_amount(&mut errors, "items.unit_cost", item.unit_cost);
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    match SupplierRepository::new(pool).exists(tenant, input.supplier_id).await {
        Ok(true) => {}
        Ok(false) => {
            return ActionResult::invalid("supplier_id", "Supplier not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to verify supplier");
            return ActionResult::failed("Failed to save purchase order".to_string());
        }
    }

    let products = ProductRepository::new(pool);
    for item in &input.items {
        match products.exists(tenant, item.product_id).await {
            Ok(true) => {}
            Ok(false) => {
                return ActionResult::invalid("items.product_id", "Product not found".to_string());
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, error = %e, "Failed to verify product");
                return ActionResult::failed("Failed to save purchase order".to_string());
            }
        }
    }

    let ordered_date = input.ordered_date.unwrap_or_else(|| Utc::now().date_naive());

    let order = match PurchaseOrderRepository::new(pool)
        .create_with_items(
            tenant,
            input.supplier_id,
            ordered_date,
            input.expected_date,
            &input.items,
        )
        .await
    {
        Ok(order) => order,
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create purchase order");
            return ActionResult::failed("Failed to save purchase order".to_string());
        }
    };

    cache.invalidate_all(&order_tags(tenant));

    ActionResult::ok(format!(
        "Purchase order created with {} item(s)",
        order.items.len()
    ))
}

/// Send a draft order to its supplier.
pub async fn place(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: PurchaseOrderId,
) -> ActionResult {
    transition(pool, cache, tenant, id, PurchaseOrderStatus::Ordered, "Purchase order placed").await
}

/// Cancel an unreceived order.
pub async fn cancel(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: PurchaseOrderId,
) -> ActionResult {
    transition(
        pool,
        cache,
        tenant,
        id,
        PurchaseOrderStatus::Cancelled,
        "Purchase order cancelled",
    )
    .await
}

/// Receive an order into stock.
pub async fn receive(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: PurchaseOrderId,
) -> ActionResult {
    let order = match PurchaseOrderRepository::new(pool).receive(tenant, id).await {
        Ok(order) => order,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Purchase order not found or not receivable".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, order = %id, error = %e, "Failed to receive purchase order");
            return ActionResult::failed("Failed to receive purchase order".to_string());
        }
    };

    cache.invalidate_all(&receipt_tags(tenant));

    ActionResult::ok(format!(
        "Purchase order received: {} line item(s) added to stock",
        order.items.len()
    ))
}

async fn transition(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: PurchaseOrderId,
    to: PurchaseOrderStatus,
    ok_message: &str,
) -> ActionResult {
    match PurchaseOrderRepository::new(pool).transition(tenant, id, to).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed(
                "Purchase order not found or not in a valid status".to_string(),
            );
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, order = %id, error = %e, "Failed to update purchase order");
            return ActionResult::failed("Failed to update purchase order".to_string());
        }
    }

    cache.invalidate_all(&order_tags(tenant));

    ActionResult::ok(ok_message.to_string())
}

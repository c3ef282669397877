//! Product mutation actions.

use sqlx::PgPool;

use stockroom_core::{ProductId, TenantId};

use super::{
    ActionResult, FieldErrors, require_non_empty, require_non_negative,
    require_non_negative_amount,
};
use crate::cache::{self, ResultCache, tags};
use crate::db::{
    ActivityLogRepository, CategoryRepository, ProductRepository, RepositoryError,
    SupplierRepository,
};
use crate::models::product::{CreateProductInput, UpdateProductInput};

fn product_tags(tenant: TenantId) -> [String; 3] {
    [
        cache::scoped(tags::PRODUCTS, tenant),
        cache::scoped(tags::ANALYTICS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a product.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateProductInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", &input.name);
    require_non_negative(&mut errors, "quantity", input.quantity);
    require_non_negative_amount(&mut errors, "unit_price", input.unit_price);
    if let Some(threshold) = input.low_stock_threshold {
        require_non_negative(&mut errors, "low_stock_threshold", threshold);
    }
    if let Some(sku) = input.sku.as_deref()
        && sku.trim().is_empty()
    {
        errors.push("sku", "sku cannot be blank".to_string());
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    if let Err(result) = verify_references(pool, tenant, input.category_id, input.supplier_id).await
    {
        return result;
    }

    let product = match ProductRepository::new(pool).create(tenant, input).await {
        Ok(product) => product,
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("sku", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create product");
            return ActionResult::failed("Failed to save product".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        product.id,
        "create",
        &format!("Created product {}", product.name),
    )
    .await;
    cache.invalidate_all(&product_tags(tenant));

    ActionResult::ok(format!("Product {} created", product.name))
}

/// Update a product.
pub async fn update(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: ProductId,
    input: &UpdateProductInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if let Some(name) = input.name.as_deref() {
        require_non_empty(&mut errors, "name", name);
    }
    if let Some(quantity) = input.quantity {
        require_non_negative(&mut errors, "quantity", quantity);
    }
    if let Some(unit_price) = input.unit_price {
        require_non_negative_amount(&mut errors, "unit_price", unit_price);
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    if let Err(result) = verify_references(pool, tenant, input.category_id, input.supplier_id).await
    {
        return result;
    }

    let product = match ProductRepository::new(pool).update(tenant, id, input).await {
        Ok(product) => product,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Product not found".to_string());
        }
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("sku", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, product = %id, error = %e, "Failed to update product");
            return ActionResult::failed("Failed to save product".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        product.id,
        "update",
        &format!("Updated product {}", product.name),
    )
    .await;
    cache.invalidate_all(&product_tags(tenant));

    ActionResult::ok(format!("Product {} updated", product.name))
}

/// Delete a product.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: ProductId,
) -> ActionResult {
    match ProductRepository::new(pool).delete(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Product not found".to_string()),
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::failed(message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, product = %id, error = %e, "Failed to delete product");
            return ActionResult::failed("Failed to delete product".to_string());
        }
    }

    record_activity(pool, tenant, id, "delete", "Deleted product").await;
    cache.invalidate_all(&product_tags(tenant));

    ActionResult::ok("Product deleted".to_string())
}

/// Verify that referenced category and supplier IDs belong to the tenant.
/// Foreign rows read as missing, never as someone else's.
async fn verify_references(
    pool: &PgPool,
    tenant: TenantId,
    category_id: Option<stockroom_core::CategoryId>,
    supplier_id: Option<stockroom_core::SupplierId>,
) -> Result<(), ActionResult> {
    if let Some(category_id) = category_id {
        match CategoryRepository::new(pool).exists(tenant, category_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ActionResult::invalid(
                    "category_id",
                    "Category not found".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, error = %e, "Failed to verify category");
                return Err(ActionResult::failed("Failed to save product".to_string()));
            }
        }
    }

    if let Some(supplier_id) = supplier_id {
        match SupplierRepository::new(pool).exists(tenant, supplier_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ActionResult::invalid(
                    "supplier_id",
                    "Supplier not found".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(tenant = %tenant, error = %e, "Failed to verify supplier");
                return Err(ActionResult::failed("Failed to save product".to_string()));
            }
        }
    }

    Ok(())
}

async fn record_activity(
    pool: &PgPool,
    tenant: TenantId,
    id: ProductId,
    action: &str,
    detail: &str,
) {
    if let Err(e) = ActivityLogRepository::new(pool)
        .record(tenant, "product", id.as_i32(), action, detail)
        .await
    {
        tracing::warn!(tenant = %tenant, error = %e, "Failed to record product activity");
    }
}

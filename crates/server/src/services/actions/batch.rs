//! Batch mutation actions.
//!
//! Batch writes adjust the owning product's on-hand quantity; the
//! repository runs the batch row, the product row, and the activity entry
//! in one transaction, so invalidation here happens strictly after
//! commit.

use sqlx::PgPool;

use stockroom_core::{BatchId, TenantId};

use super::{ActionResult, FieldErrors, require_non_empty, require_non_negative, require_positive};
use crate::cache::{self, ResultCache, tags};
use crate::db::{BatchRepository, ProductRepository, RepositoryError};
use crate::models::batch::{CreateBatchInput, UpdateBatchInput};

fn batch_tags(tenant: TenantId) -> [String; 4] {
    [
        cache::scoped(tags::BATCHES, tenant),
        cache::scoped(tags::PRODUCTS, tenant),
        cache::scoped(tags::ANALYTICS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Receive a batch into stock.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateBatchInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "batch_number", &input.batch_number);
    require_positive(&mut errors, "quantity", input.quantity);
    if !errors.is_empty() {
        return errors.into_result();
    }

    match ProductRepository::new(pool).exists(tenant, input.product_id).await {
        Ok(true) => {}
        Ok(false) => {
            return ActionResult::invalid("product_id", "Product not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to verify product");
            return ActionResult::failed("Failed to save batch".to_string());
        }
    }

    let batch = match BatchRepository::new(pool).create_with_stock(tenant, input).await {
        Ok(batch) => batch,
        Err(RepositoryError::NotFound) => {
            return ActionResult::invalid("product_id", "Product not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create batch");
            return ActionResult::failed("Failed to save batch".to_string());
        }
    };

    cache.invalidate_all(&batch_tags(tenant));

    ActionResult::ok(format!(
        "Batch {} received ({} units)",
        batch.batch_number, batch.quantity
    ))
}

/// Correct a batch record.
pub async fn update(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: BatchId,
    input: &UpdateBatchInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if let Some(batch_number) = input.batch_number.as_deref() {
        require_non_empty(&mut errors, "batch_number", batch_number);
    }
    if let Some(quantity) = input.quantity {
        require_non_negative(&mut errors, "quantity", quantity);
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    let batch = match BatchRepository::new(pool).update_with_stock(tenant, id, input).await {
        Ok(batch) => batch,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Batch not found".to_string());
        }
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("quantity", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, batch = %id, error = %e, "Failed to update batch");
            return ActionResult::failed("Failed to save batch".to_string());
        }
    };

    cache.invalidate_all(&batch_tags(tenant));

    ActionResult::ok(format!("Batch {} updated", batch.batch_number))
}

/// Remove a batch record and back its units out of stock.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: BatchId,
) -> ActionResult {
    match BatchRepository::new(pool).delete_with_stock(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Batch not found".to_string()),
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::failed(message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, batch = %id, error = %e, "Failed to delete batch");
            return ActionResult::failed("Failed to delete batch".to_string());
        }
    }

    cache.invalidate_all(&batch_tags(tenant));

    ActionResult::ok("Batch removed".to_string())
}

//! Supplier mutation actions.

use sqlx::PgPool;

use stockroom_core::{SupplierId, TenantId};

use super::{ActionResult, FieldErrors, require_non_empty, require_valid_email};
use crate::cache::{self, ResultCache, tags};
use crate::db::{ActivityLogRepository, RepositoryError, SupplierRepository};
use crate::models::supplier::{CreateSupplierInput, UpdateSupplierInput};

fn supplier_tags(tenant: TenantId) -> [String; 2] {
    [
        cache::scoped(tags::SUPPLIERS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a supplier.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateSupplierInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", &input.name);
    require_valid_email(&mut errors, "contact_email", input.contact_email.as_deref());
    if !errors.is_empty() {
        return errors.into_result();
    }

    let supplier = match SupplierRepository::new(pool).create(tenant, input).await {
        Ok(supplier) => supplier,
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create supplier");
            return ActionResult::failed("Failed to save supplier".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        supplier.id,
        "create",
        &format!("Created supplier {}", supplier.name),
    )
    .await;
    cache.invalidate_all(&supplier_tags(tenant));

    ActionResult::ok(format!("Supplier {} created", supplier.name))
}

/// Update a supplier.
pub async fn update(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: SupplierId,
    input: &UpdateSupplierInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if let Some(name) = input.name.as_deref() {
        require_non_empty(&mut errors, "name", name);
    }
    require_valid_email(&mut errors, "contact_email", input.contact_email.as_deref());
    if !errors.is_empty() {
        return errors.into_result();
    }

    let supplier = match SupplierRepository::new(pool).update(tenant, id, input).await {
        Ok(supplier) => supplier,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Supplier not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, supplier = %id, error = %e, "Failed to update supplier");
            return ActionResult::failed("Failed to save supplier".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        supplier.id,
        "update",
        &format!("Updated supplier {}", supplier.name),
    )
    .await;
    cache.invalidate_all(&supplier_tags(tenant));

    ActionResult::ok(format!("Supplier {} updated", supplier.name))
}

/// Delete a supplier.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: SupplierId,
) -> ActionResult {
    match SupplierRepository::new(pool).delete(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Supplier not found".to_string()),
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::failed(message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, supplier = %id, error = %e, "Failed to delete supplier");
            return ActionResult::failed("Failed to delete supplier".to_string());
        }
    }

    record_activity(pool, tenant, id, "delete", "Deleted supplier").await;
    cache.invalidate_all(&supplier_tags(tenant));

    ActionResult::ok("Supplier deleted".to_string())
}

async fn record_activity(
    pool: &PgPool,
    tenant: TenantId,
    id: SupplierId,
    action: &str,
    detail: &str,
) {
    if let Err(e) = ActivityLogRepository::new(pool)
        .record(tenant, "supplier", id.as_i32(), action, detail)
        .await
    {
        tracing::warn!(tenant = %tenant, error = %e, "Failed to record supplier activity");
    }
}

//! Customer mutation actions.

use sqlx::PgPool;

use stockroom_core::{CustomerId, TenantId};

use super::{ActionResult, FieldErrors, require_non_empty, require_valid_email};
use crate::cache::{self, ResultCache, tags};
use crate::db::{ActivityLogRepository, CustomerRepository, RepositoryError};
use crate::models::customer::{CreateCustomerInput, UpdateCustomerInput};

fn customer_tags(tenant: TenantId) -> [String; 2] {
    [
        cache::scoped(tags::CUSTOMERS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a customer.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateCustomerInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", &input.name);
    require_valid_email(&mut errors, "email", input.email.as_deref());
    if !errors.is_empty() {
        return errors.into_result();
    }

    let customer = match CustomerRepository::new(pool).create(tenant, input).await {
        Ok(customer) => customer,
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create customer");
            return ActionResult::failed("Failed to save customer".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        customer.id,
        "create",
        &format!("Created customer {}", customer.name),
    )
    .await;
    cache.invalidate_all(&customer_tags(tenant));

    ActionResult::ok(format!("Customer {} created", customer.name))
}

/// Update a customer.
pub async fn update(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: CustomerId,
    input: &UpdateCustomerInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if let Some(name) = input.name.as_deref() {
        require_non_empty(&mut errors, "name", name);
    }
    require_valid_email(&mut errors, "email", input.email.as_deref());
    if !errors.is_empty() {
        return errors.into_result();
    }

    let customer = match CustomerRepository::new(pool).update(tenant, id, input).await {
        Ok(customer) => customer,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Customer not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, customer = %id, error = %e, "Failed to update customer");
            return ActionResult::failed("Failed to save customer".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        customer.id,
        "update",
        &format!("Updated customer {}", customer.name),
    )
    .await;
    cache.invalidate_all(&customer_tags(tenant));

    ActionResult::ok(format!("Customer {} updated", customer.name))
}

/// Delete a customer. Their sales are kept with the reference cleared.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: CustomerId,
) -> ActionResult {
    match CustomerRepository::new(pool).delete(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Customer not found".to_string()),
        Err(e) => {
            tracing::error!(tenant = %tenant, customer = %id, error = %e, "Failed to delete customer");
            return ActionResult::failed("Failed to delete customer".to_string());
        }
    }

    record_activity(pool, tenant, id, "delete", "Deleted customer").await;
    cache.invalidate_all(&customer_tags(tenant));

    ActionResult::ok("Customer deleted".to_string())
}

async fn record_activity(
    pool: &PgPool,
    tenant: TenantId,
    id: CustomerId,
    action: &str,
    detail: &str,
) {
    if let Err(e) = ActivityLogRepository::new(pool)
        .record(tenant, "customer", id.as_i32(), action, detail)
        .await
    {
        tracing::warn!(tenant = %tenant, error = %e, "Failed to record customer activity");
    }
}

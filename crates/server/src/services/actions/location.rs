//! Location mutation actions.

use sqlx::PgPool;

use stockroom_core::{LocationId, TenantId};

use super::{ActionResult, FieldErrors, require_non_empty};
use crate::cache::{self, ResultCache, tags};
use crate::db::{ActivityLogRepository, LocationRepository, RepositoryError};
use crate::models::location::{CreateLocationInput, UpdateLocationInput};

fn location_tags(tenant: TenantId) -> [String; 2] {
    [
        cache::scoped(tags::LOCATIONS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a location.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateLocationInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", &input.name);
    if !errors.is_empty() {
        return errors.into_result();
    }

    let location = match LocationRepository::new(pool).create(tenant, input).await {
        Ok(location) => location,
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create location");
            return ActionResult::failed("Failed to save location".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        location.id,
        "create",
        &format!("Created location {}", location.name),
    )
    .await;
    cache.invalidate_all(&location_tags(tenant));

    ActionResult::ok(format!("Location {} created", location.name))
}

/// Update a location.
pub async fn update(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: LocationId,
    input: &UpdateLocationInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    if let Some(name) = input.name.as_deref() {
        require_non_empty(&mut errors, "name", name);
    }
    if !errors.is_empty() {
        return errors.into_result();
    }

    let location = match LocationRepository::new(pool).update(tenant, id, input).await {
        Ok(location) => location,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Location not found".to_string());
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, location = %id, error = %e, "Failed to update location");
            return ActionResult::failed("Failed to save location".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        location.id,
        "update",
        &format!("Updated location {}", location.name),
    )
    .await;
    cache.invalidate_all(&location_tags(tenant));

    ActionResult::ok(format!("Location {} updated", location.name))
}

/// Delete a location.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: LocationId,
) -> ActionResult {
    match LocationRepository::new(pool).delete(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Location not found".to_string()),
        Err(e) => {
            tracing::error!(tenant = %tenant, location = %id, error = %e, "Failed to delete location");
            return ActionResult::failed("Failed to delete location".to_string());
        }
    }

    record_activity(pool, tenant, id, "delete", "Deleted location").await;
    cache.invalidate_all(&location_tags(tenant));

    ActionResult::ok("Location deleted".to_string())
}

async fn record_activity(
    pool: &PgPool,
    tenant: TenantId,
    id: LocationId,
    action: &str,
    detail: &str,
) {
    if let Err(e) = ActivityLogRepository::new(pool)
        .record(tenant, "location", id.as_i32(), action, detail)
        .await
    {
        tracing::warn!(tenant = %tenant, error = %e, "Failed to record location activity");
    }
}

//! Category mutation actions.

use sqlx::PgPool;

use stockroom_core::{CategoryId, TenantId};

use super::{ActionResult, FieldErrors, require_non_empty};
use crate::cache::{self, ResultCache, tags};
use crate::db::{ActivityLogRepository, CategoryRepository, RepositoryError};
use crate::models::category::CreateCategoryInput;

// Category names show up in analytics labels, so valuation caches go too.
fn category_tags(tenant: TenantId) -> [String; 3] {
    [
        cache::scoped(tags::CATEGORIES, tenant),
        cache::scoped(tags::ANALYTICS, tenant),
        cache::scoped(tags::ACTIVITY_LOG, tenant),
    ]
}

/// Create a category.
pub async fn create(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    input: &CreateCategoryInput,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", &input.name);
    if !errors.is_empty() {
        return errors.into_result();
    }

    let category = match CategoryRepository::new(pool).create(tenant, input).await {
        Ok(category) => category,
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("name", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, error = %e, "Failed to create category");
            return ActionResult::failed("Failed to save category".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        category.id,
        "create",
        &format!("Created category {}", category.name),
    )
    .await;
    cache.invalidate_all(&category_tags(tenant));

    ActionResult::ok(format!("Category {} created", category.name))
}

/// Rename a category.
pub async fn rename(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: CategoryId,
    name: &str,
) -> ActionResult {
    let mut errors = FieldErrors::default();
    require_non_empty(&mut errors, "name", name);
    if !errors.is_empty() {
        return errors.into_result();
    }

    let category = match CategoryRepository::new(pool).rename(tenant, id, name).await {
        Ok(category) => category,
        Err(RepositoryError::NotFound) => {
            return ActionResult::failed("Category not found".to_string());
        }
        Err(RepositoryError::Conflict(message)) => {
            return ActionResult::invalid("name", message);
        }
        Err(e) => {
            tracing::error!(tenant = %tenant, category = %id, error = %e, "Failed to rename category");
            return ActionResult::failed("Failed to save category".to_string());
        }
    };

    record_activity(
        pool,
        tenant,
        category.id,
        "update",
        &format!("Renamed category to {}", category.name),
    )
    .await;
    cache.invalidate_all(&category_tags(tenant));

    ActionResult::ok(format!("Category renamed to {}", category.name))
}

/// Delete a category. Products keep existing, uncategorized.
pub async fn delete(
    pool: &PgPool,
    cache: &ResultCache,
    tenant: TenantId,
    id: CategoryId,
) -> ActionResult {
    match CategoryRepository::new(pool).delete(tenant, id).await {
        Ok(true) => {}
        Ok(false) => return ActionResult::failed("Category not found".to_string()),
        Err(e) => {
            tracing::error!(tenant = %tenant, category = %id, error = %e, "Failed to delete category");
            return ActionResult::failed("Failed to delete category".to_string());
        }
    }

    record_activity(pool, tenant, id, "delete", "Deleted category").await;
    cache.invalidate_all(&category_tags(tenant));

    ActionResult::ok("Category deleted".to_string())
}

async fn record_activity(
    pool: &PgPool,
    tenant: TenantId,
    id: CategoryId,
    action: &str,
    detail: &str,
) {
    if let Err(e) = ActivityLogRepository::new(pool)
        .record(tenant, "category", id.as_i32(), action, detail)
        .await
    {
        tracing::warn!(tenant = %tenant, error = %e, "Failed to record category activity");
    }
}

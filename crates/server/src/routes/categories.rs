//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use stockroom_core::CategoryId;

use crate::cache::{self, tags, ttl};
use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::category::{Category, CreateCategoryInput};
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// All categories for the tenant (cached reference data).
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let tenant = user.tenant();
    let key = cache::key("categories", tenant, "");
    let tag_set = vec![cache::scoped(tags::CATEGORIES, tenant)];

    let categories = state
        .cache()
        .get_or_compute(&key, &tag_set, ttl::REFERENCE, || async {
            CategoryRepository::new(state.pool()).list(tenant).await
        })
        .await?;

    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> Json<ActionResult> {
    Json(actions::category::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Rename a category.
#[instrument(skip(user, state, input))]
pub async fn rename(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CreateCategoryInput>,
) -> Json<ActionResult> {
    Json(
        actions::category::rename(
            state.pool(),
            state.cache(),
            user.tenant(),
            CategoryId::new(id),
            &input.name,
        )
        .await,
    )
}

/// Delete a category.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::category::delete(state.pool(), state.cache(), user.tenant(), CategoryId::new(id))
            .await,
    )
}

//! Location route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use stockroom_core::LocationId;

use crate::cache::{self, tags, ttl};
use crate::db::LocationRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::location::{CreateLocationInput, Location, UpdateLocationInput};
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// All locations for the tenant (cached reference data).
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Location>>, AppError> {
    let tenant = user.tenant();
    let key = cache::key("locations", tenant, "");
    let tag_set = vec![cache::scoped(tags::LOCATIONS, tenant)];

    let locations = state
        .cache()
        .get_or_compute(&key, &tag_set, ttl::REFERENCE, || async {
            LocationRepository::new(state.pool()).list(tenant).await
        })
        .await?;

    Ok(Json(locations))
}

/// Create a location.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateLocationInput>,
) -> Json<ActionResult> {
    Json(actions::location::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Update a location.
#[instrument(skip(user, state, input))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateLocationInput>,
) -> Json<ActionResult> {
    Json(
        actions::location::update(
            state.pool(),
            state.cache(),
            user.tenant(),
            LocationId::new(id),
            &input,
        )
        .await,
    )
}

/// Delete a location.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::location::delete(state.pool(), state.cache(), user.tenant(), LocationId::new(id))
            .await,
    )
}

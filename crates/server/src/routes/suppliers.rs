//! Supplier route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::SupplierId;

use crate::cache::{self, tags, ttl};
use crate::db::SupplierRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::supplier::{CreateSupplierInput, Supplier, SupplierFilter, UpdateSupplierInput};
use crate::pagination::{Page, page_offset};
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Suppliers per page.
const PAGE_SIZE: i64 = 20;

/// Query parameters for the supplier list.
#[derive(Debug, Deserialize)]
pub struct SupplierListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Case-insensitive substring match on name.
    pub search: Option<String>,
    /// Exact-match industry filter.
    pub industry: Option<String>,
}

/// Supplier listing with filters and pagination (cached reference data).
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SupplierListQuery>,
) -> Result<Json<Page<Supplier>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let filter = SupplierFilter {
        search: query.search,
        industry: query.industry,
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let params = format!(
        "page={page}&search={}&industry={}",
        filter.search.as_deref().unwrap_or(""),
        filter.industry.as_deref().unwrap_or(""),
    );
    let key = cache::key("suppliers", tenant, &params);
    let tag_set = vec![cache::scoped(tags::SUPPLIERS, tenant)];

    let result = state
        .cache()
        .get_or_compute(&key, &tag_set, ttl::REFERENCE, || async {
            let repo = SupplierRepository::new(state.pool());
            let (items, total) =
                tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;
            Ok(Page::new(items, page, PAGE_SIZE, total))
        })
        .await?;

    Ok(Json(result))
}

/// Supplier detail.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Supplier>, AppError> {
    let supplier = SupplierRepository::new(state.pool())
        .get(user.tenant(), SupplierId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("supplier {id}")))?;

    Ok(Json(supplier))
}

/// Create a supplier.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> Json<ActionResult> {
    Json(actions::supplier::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Update a supplier.
#[instrument(skip(user, state, input))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateSupplierInput>,
) -> Json<ActionResult> {
    Json(
        actions::supplier::update(
            state.pool(),
            state.cache(),
            user.tenant(),
            SupplierId::new(id),
            &input,
        )
        .await,
    )
}

/// Delete a supplier.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::supplier::delete(state.pool(), state.cache(), user.tenant(), SupplierId::new(id))
            .await,
    )
}

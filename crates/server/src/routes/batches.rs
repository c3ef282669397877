//! Batch route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{BatchId, ProductId};

use crate::db::BatchRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::batch::{Batch, BatchFilter, CreateBatchInput, UpdateBatchInput};
use crate::pagination::{Page, page_offset};
use crate::routes::parse_date_param;
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Batches per page.
const PAGE_SIZE: i64 = 20;

/// Query parameters for the batch list.
#[derive(Debug, Deserialize)]
pub struct BatchListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Filter by product.
    pub product: Option<i32>,
    /// Received on or after this ISO date.
    pub start_date: Option<String>,
    /// Received on or before this ISO date.
    pub end_date: Option<String>,
}

/// Batch listing with filters and pagination.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<BatchListQuery>,
) -> Result<Json<Page<Batch>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let filter = BatchFilter {
        product_id: query.product.map(ProductId::new),
        start_date: parse_date_param("start_date", query.start_date.as_deref())?,
        end_date: parse_date_param("end_date", query.end_date.as_deref())?,
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let repo = BatchRepository::new(state.pool());
    let (items, total) = tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// Batch detail.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Batch>, AppError> {
    let batch = BatchRepository::new(state.pool())
        .get(user.tenant(), BatchId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("batch {id}")))?;

    Ok(Json(batch))
}

/// Receive a batch into stock.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateBatchInput>,
) -> Json<ActionResult> {
    Json(actions::batch::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Correct a batch record.
#[instrument(skip(user, state, input))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBatchInput>,
) -> Json<ActionResult> {
    Json(
        actions::batch::update(
            state.pool(),
            state.cache(),
            user.tenant(),
            BatchId::new(id),
            &input,
        )
        .await,
    )
}

/// Remove a batch and back its units out of stock.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(actions::batch::delete(state.pool(), state.cache(), user.tenant(), BatchId::new(id)).await)
}

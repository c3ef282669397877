//! Sale route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::SaleId;

use crate::db::SaleRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::analytics::DateRange;
use crate::models::sale::{CreateSaleInput, Sale, SaleWithItems};
use crate::pagination::{Page, page_offset};
use crate::routes::parse_date_param;
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Sales per page.
const PAGE_SIZE: i64 = 10;

/// Query parameters for the sale list (ISO dates, inclusive).
#[derive(Debug, Deserialize)]
pub struct SaleListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Sale listing over an optional date range, newest first.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SaleListQuery>,
) -> Result<Json<Page<Sale>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let range = DateRange {
        start: parse_date_param("start_date", query.start_date.as_deref())?,
        end: parse_date_param("end_date", query.end_date.as_deref())?,
    };

    let repo = SaleRepository::new(state.pool());
    let (items, total) = tokio::try_join!(
        repo.list(tenant, range, PAGE_SIZE, offset),
        repo.count(tenant, range),
    )?;

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// Sale detail with line items.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SaleWithItems>, AppError> {
    let sale = SaleRepository::new(state.pool())
        .get_with_items(user.tenant(), SaleId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sale {id}")))?;

    Ok(Json(sale))
}

/// Record a sale and draw its units down from stock.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> Json<ActionResult> {
    Json(actions::sale::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

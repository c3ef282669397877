//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{CategoryId, ProductId, SupplierId};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
use crate::pagination::{Page, page_offset};
use crate::services::StockAlertService;
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Products per page.
const PAGE_SIZE: i64 = 20;

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Case-insensitive substring match on name, SKU, or manufacturer.
    pub search: Option<String>,
    /// Filter by category.
    pub category: Option<i32>,
    /// Filter by supplier.
    pub supplier: Option<i32>,
    /// Only products currently alerting.
    pub low_stock: Option<bool>,
}

/// Request body for setting a threshold. `null` clears it.
#[derive(Debug, Deserialize)]
pub struct ThresholdRequest {
    pub threshold: Option<i32>,
}

/// Product listing with filters and pagination.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Page<Product>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let filter = ProductFilter {
        search: query.search,
        category_id: query.category.map(CategoryId::new),
        supplier_id: query.supplier.map(SupplierId::new),
        alerting_only: query.low_stock.unwrap_or(false),
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let repo = ProductRepository::new(state.pool());
    let (items, total) = tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// Product detail.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(user.tenant(), ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Json<ActionResult> {
    Json(actions::product::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Update a product.
#[instrument(skip(user, state, input))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProductInput>,
) -> Json<ActionResult> {
    Json(
        actions::product::update(
            state.pool(),
            state.cache(),
            user.tenant(),
            ProductId::new(id),
            &input,
        )
        .await,
    )
}

/// Delete a product.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(actions::product::delete(state.pool(), state.cache(), user.tenant(), ProductId::new(id)).await)
}

/// Set or clear a product's low stock threshold.
#[instrument(skip(user, state))]
pub async fn set_threshold(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ThresholdRequest>,
) -> Json<ActionResult> {
    let result = StockAlertService::new(state.pool(), state.cache())
        .set_alert_threshold(user.tenant(), ProductId::new(id), body.threshold)
        .await;

    Json(result)
}

//! Purchase order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{PurchaseOrderId, SupplierId};

use crate::db::PurchaseOrderRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrder, PurchaseOrderFilter, PurchaseOrderStatus,
    PurchaseOrderWithItems,
};
use crate::pagination::{Page, page_offset};
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Purchase orders per page.
const PAGE_SIZE: i64 = 10;

/// Query parameters for the purchase order list.
#[derive(Debug, Deserialize)]
pub struct PurchaseOrderListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Exact-match status filter.
    pub status: Option<String>,
    /// Filter by supplier.
    pub supplier: Option<i32>,
}

/// Purchase order listing with filters and pagination.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<Json<Page<PurchaseOrder>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(PurchaseOrderStatus::parse(raw).ok_or_else(|| {
            AppError::BadRequest(
                "status must be one of draft, ordered, received, cancelled".to_string(),
            )
        })?),
    };

    let filter = PurchaseOrderFilter {
        status,
        supplier_id: query.supplier.map(SupplierId::new),
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let repo = PurchaseOrderRepository::new(state.pool());
    let (items, total) = tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// Purchase order detail with line items.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PurchaseOrderWithItems>, AppError> {
    let order = PurchaseOrderRepository::new(state.pool())
        .get_with_items(user.tenant(), PurchaseOrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase order {id}")))?;

    Ok(Json(order))
}

/// Create a draft purchase order.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> Json<ActionResult> {
    Json(actions::purchase_order::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Send a draft order to its supplier.
#[instrument(skip(user, state))]
pub async fn place(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::purchase_order::place(
            state.pool(),
            state.cache(),
            user.tenant(),
            PurchaseOrderId::new(id),
        )
        .await,
    )
}

/// Cancel an unreceived order.
#[instrument(skip(user, state))]
pub async fn cancel(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::purchase_order::cancel(
            state.pool(),
            state.cache(),
            user.tenant(),
            PurchaseOrderId::new(id),
        )
        .await,
    )
}

/// Receive an order into stock.
#[instrument(skip(user, state))]
pub async fn receive(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::purchase_order::receive(
            state.pool(),
            state.cache(),
            user.tenant(),
            PurchaseOrderId::new(id),
        )
        .await,
    )
}

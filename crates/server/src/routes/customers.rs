//! Customer route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::CustomerId;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::customer::{
    CreateCustomerInput, Customer, CustomerFilter, CustomerStatus, UpdateCustomerInput,
};
use crate::pagination::{Page, page_offset};
use crate::services::actions::{self, ActionResult};
use crate::state::AppState;

/// Customers per page.
const PAGE_SIZE: i64 = 20;

/// Query parameters for the customer list.
#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
    /// Exact-match status filter ("active" or "archived").
    pub status: Option<String>,
}

/// Customer listing with filters and pagination.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Page<Customer>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(CustomerStatus::parse(raw).ok_or_else(|| {
            AppError::BadRequest("status must be 'active' or 'archived'".to_string())
        })?),
    };

    let filter = CustomerFilter {
        search: query.search,
        status,
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let repo = CustomerRepository::new(state.pool());
    let (items, total) = tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;

    Ok(Json(Page::new(items, page, PAGE_SIZE, total)))
}

/// Customer detail.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Customer>, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .get(user.tenant(), CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(customer))
}

/// Create a customer.
#[instrument(skip(user, state, input))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> Json<ActionResult> {
    Json(actions::customer::create(state.pool(), state.cache(), user.tenant(), &input).await)
}

/// Update a customer.
#[instrument(skip(user, state, input))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCustomerInput>,
) -> Json<ActionResult> {
    Json(
        actions::customer::update(
            state.pool(),
            state.cache(),
            user.tenant(),
            CustomerId::new(id),
            &input,
        )
        .await,
    )
}

/// Delete a customer.
#[instrument(skip(user, state))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ActionResult> {
    Json(
        actions::customer::delete(state.pool(), state.cache(), user.tenant(), CustomerId::new(id))
            .await,
    )
}

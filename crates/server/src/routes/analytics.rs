//! Analytics route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::analytics::{DateRange, InventoryAnalytics, SalesAnalytics};
use crate::routes::parse_date_param;
use crate::services::AnalyticsService;
use crate::state::AppState;

/// Query parameters for the sales analytics range (ISO dates, inclusive).
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inventory valuation snapshot.
#[instrument(skip(user, state))]
pub async fn inventory(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<InventoryAnalytics>, AppError> {
    let snapshot = AnalyticsService::new(state.pool(), state.cache())
        .inventory_analytics(user.tenant())
        .await?;

    Ok(Json(snapshot))
}

/// Sales aggregates over an optional inclusive date range.
#[instrument(skip(user, state))]
pub async fn sales(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesAnalytics>, AppError> {
    let range = DateRange {
        start: parse_date_param("start_date", query.start_date.as_deref())?,
        end: parse_date_param("end_date", query.end_date.as_deref())?,
    };
    if let (Some(start), Some(end)) = (range.start, range.end)
        && start > end
    {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let analytics = AnalyticsService::new(state.pool(), state.cache())
        .sales_analytics(user.tenant(), range)
        .await?;

    Ok(Json(analytics))
}

//! Stock alert route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::alert::{AlertSummary, ReorderRecommendation, StockAlert};
use crate::services::StockAlertService;
use crate::services::alerts::DEFAULT_DAYS_OF_STOCK;
use crate::state::AppState;

/// Query parameters for reorder recommendations.
#[derive(Debug, Deserialize)]
pub struct ReorderQuery {
    /// Planning horizon in days.
    pub days: Option<i32>,
}

/// Current stock alerts, most urgent first.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StockAlert>>, AppError> {
    let alerts = StockAlertService::new(state.pool(), state.cache())
        .stock_alerts(user.tenant())
        .await?;

    Ok(Json(alerts))
}

/// Alert counts for dashboard tiles.
#[instrument(skip(user, state))]
pub async fn summary(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<AlertSummary>, AppError> {
    let summary = StockAlertService::new(state.pool(), state.cache())
        .alert_summary(user.tenant())
        .await?;

    Ok(Json(summary))
}

/// Reorder recommendations, most urgent first.
#[instrument(skip(user, state))]
pub async fn reorder(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ReorderQuery>,
) -> Result<Json<Vec<ReorderRecommendation>>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_DAYS_OF_STOCK);
    if days <= 0 {
        return Err(AppError::BadRequest(
            "days must be greater than zero".to_string(),
        ));
    }

    let recommendations = StockAlertService::new(state.pool(), state.cache())
        .reorder_recommendations(user.tenant(), days)
        .await?;

    Ok(Json(recommendations))
}

//! Dashboard route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::cache::{self, tags, ttl};
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::activity::{ActivityEntry, ActivityFilter};
use crate::models::alert::AlertSummary;
use crate::models::analytics::InventoryAnalytics;
use crate::services::{AnalyticsService, StockAlertService};
use crate::state::AppState;

/// How many recent activity entries the dashboard shows.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Everything the dashboard renders in one response.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Inventory valuation snapshot.
    pub inventory: InventoryAnalytics,
    /// Stock alert counts.
    pub alerts: AlertSummary,
    /// Most recent activity entries, newest first.
    pub recent_activity: Vec<ActivityEntry>,
}

/// Dashboard overview: three independent reads fanned out concurrently.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let tenant = user.tenant();
    let analytics = AnalyticsService::new(state.pool(), state.cache());
    let alerts = StockAlertService::new(state.pool(), state.cache());

    let recent_activity = async {
        let key = cache::key("recent_activity", tenant, "");
        let tag_set = vec![cache::scoped(tags::ACTIVITY_LOG, tenant)];
        state
            .cache()
            .get_or_compute(&key, &tag_set, ttl::ACTIVITY, || async {
                crate::db::ActivityLogRepository::new(state.pool())
                    .list(
                        tenant,
                        &ActivityFilter {
                            limit: Some(RECENT_ACTIVITY_LIMIT),
                            ..ActivityFilter::default()
                        },
                    )
                    .await
            })
            .await
    };

    let (inventory, alert_summary, recent_activity) = tokio::join!(
        analytics.inventory_analytics(tenant),
        alerts.alert_summary(tenant),
        recent_activity,
    );

    Ok(Json(DashboardResponse {
        inventory: inventory?,
        alerts: alert_summary?,
        recent_activity: recent_activity?,
    }))
}

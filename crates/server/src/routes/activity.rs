//! Activity feed route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::cache::{self, tags, ttl};
use crate::db::ActivityLogRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::activity::{ActivityEntry, ActivityFilter};
use crate::pagination::{Page, page_offset};
use crate::state::AppState;

/// Activity entries per page.
const PAGE_SIZE: i64 = 20;

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Exact-match action filter (e.g. "create", "adjust_stock").
    pub action: Option<String>,
    /// Exact-match entity type filter (e.g. "product", "sale").
    pub entity_type: Option<String>,
}

/// Activity feed, newest first (short-lived cache).
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<Page<ActivityEntry>>, AppError> {
    let tenant = user.tenant();
    let (page, offset) = page_offset(query.page, PAGE_SIZE);

    let filter = ActivityFilter {
        action: query.action,
        entity_type: query.entity_type,
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
    };

    let params = format!(
        "page={page}&action={}&entity_type={}",
        filter.action.as_deref().unwrap_or(""),
        filter.entity_type.as_deref().unwrap_or(""),
    );
    let key = cache::key("activity", tenant, &params);
    let tag_set = vec![cache::scoped(tags::ACTIVITY_LOG, tenant)];

    let result = state
        .cache()
        .get_or_compute(&key, &tag_set, ttl::ACTIVITY, || async {
            let repo = ActivityLogRepository::new(state.pool());
            let (items, total) =
                tokio::try_join!(repo.list(tenant, &filter), repo.count(tenant, &filter))?;
            Ok(Page::new(items, page, PAGE_SIZE, total))
        })
        .await?;

    Ok(Json(result))
}

//! Activity log domain models.
//!
//! Every successful mutation writes one entry; quantity adjustments write
//! theirs inside the same transaction as the stock change, so the log
//! doubles as the stock movement record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ActivityEntryId, TenantId};

/// One entry in a tenant's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unique entry ID.
    pub id: ActivityEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Kind of entity acted on (e.g. "product", "batch", "sale").
    pub entity_type: String,
    /// ID of the entity acted on.
    pub entity_id: i32,
    /// Action performed (e.g. "create", "update", "delete", "adjust_stock").
    pub action: String,
    /// Human-readable description of what happened.
    pub detail: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Filter criteria for the activity feed.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Exact-match action filter.
    pub action: Option<String>,
    /// Exact-match entity type filter.
    pub entity_type: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

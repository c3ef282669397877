//! Category domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, TenantId};

/// A product category, owned by a tenant.
///
/// Products reference a category optionally; uncategorized products are a
/// presentation fallback, not a stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Category name, unique within the tenant.
    pub name: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// Category name.
    pub name: String,
}

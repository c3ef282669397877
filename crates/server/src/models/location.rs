//! Stock location domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{LocationId, TenantId};

/// A physical location stock can live at (warehouse, shelf, store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Unique location ID.
    pub id: LocationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Location name.
    pub name: String,
    /// Street address or free-form description.
    pub address: Option<String>,
    /// When the location was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a location.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocationInput {
    /// Location name.
    pub name: String,
    /// Street address or free-form description.
    pub address: Option<String>,
}

/// Input for updating a location. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLocationInput {
    /// Location name.
    pub name: Option<String>,
    /// Street address or free-form description.
    pub address: Option<String>,
}

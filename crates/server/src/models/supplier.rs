//! Supplier domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{SupplierId, TenantId};

/// A supplier a tenant sources products from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique supplier ID.
    pub id: SupplierId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Company name.
    pub name: String,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Industry label used for filtering.
    pub industry: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the supplier was created.
    pub created_at: DateTime<Utc>,
    /// When the supplier was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplierInput {
    /// Company name.
    pub name: String,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Industry label.
    pub industry: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a supplier. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSupplierInput {
    /// Company name.
    pub name: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Industry label.
    pub industry: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter criteria for listing suppliers.
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    /// Case-insensitive substring match on name.
    pub search: Option<String>,
    /// Exact-match industry filter.
    pub industry: Option<String>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

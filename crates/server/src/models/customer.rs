//! Customer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CustomerId, TenantId};

/// Lifecycle status of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "customer_status", rename_all = "lowercase")]
pub enum CustomerStatus {
    /// Customer can be attached to new sales.
    Active,
    /// Retained for sales history only.
    Archived,
}

impl CustomerStatus {
    /// Parse a status from its query-parameter form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A customer a tenant sells to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Lifecycle status.
    pub status: CustomerStatus,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

/// Input for updating a customer. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCustomerInput {
    /// Customer name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Lifecycle status.
    pub status: Option<CustomerStatus>,
}

/// Filter criteria for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
    /// Exact-match status filter.
    pub status: Option<CustomerStatus>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

//! Batch (lot) domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{BatchId, ProductId, TenantId};

/// A batch of units received into stock for a product.
///
/// Receiving a batch increments the product's on-hand quantity in the same
/// transaction that creates the batch row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch ID.
    pub id: BatchId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Product the batch belongs to.
    pub product_id: ProductId,
    /// Batch number identifier.
    pub batch_number: String,
    /// Number of units received.
    pub quantity: i32,
    /// Date received into stock.
    pub received_date: NaiveDate,
    /// Expiry date, for perishable stock.
    pub expiry_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the batch was created.
    pub created_at: DateTime<Utc>,
}

/// Input for receiving a new batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatchInput {
    /// Product the batch belongs to.
    pub product_id: ProductId,
    /// Batch number identifier.
    pub batch_number: String,
    /// Number of units received.
    pub quantity: i32,
    /// Date received into stock.
    pub received_date: NaiveDate,
    /// Expiry date, for perishable stock.
    pub expiry_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for correcting a batch record. `None` fields are left unchanged.
///
/// Quantity corrections adjust the product's on-hand stock by the delta.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBatchInput {
    /// Batch number identifier.
    pub batch_number: Option<String>,
    /// Corrected number of units.
    pub quantity: Option<i32>,
    /// Expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter criteria for listing batches.
#[derive(Debug, Clone, Default)]
pub struct BatchFilter {
    /// Filter by product.
    pub product_id: Option<ProductId>,
    /// Received on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Received on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

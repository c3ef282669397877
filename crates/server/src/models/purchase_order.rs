//! Purchase order domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, PurchaseOrderId, PurchaseOrderItemId, SupplierId, TenantId};

/// Status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "purchase_order_status", rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    /// Being drafted, not yet sent to the supplier.
    Draft,
    /// Sent to the supplier, awaiting delivery.
    Ordered,
    /// Delivered; stock has been incremented.
    Received,
    /// Cancelled before receipt.
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Parse a status from its query-parameter form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "ordered" => Some(Self::Ordered),
            "received" => Some(Self::Received),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A purchase order placed with a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique purchase order ID.
    pub id: PurchaseOrderId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Supplier the order was placed with.
    pub supplier_id: SupplierId,
    /// Current status.
    pub status: PurchaseOrderStatus,
    /// Date the order was placed.
    pub ordered_date: NaiveDate,
    /// Expected delivery date.
    pub expected_date: Option<NaiveDate>,
    /// When the order was received, if it has been.
    pub received_at: Option<DateTime<Utc>>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A line item on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    /// Unique line item ID.
    pub id: PurchaseOrderItemId,
    /// Purchase order this item belongs to.
    pub purchase_order_id: PurchaseOrderId,
    /// Product being ordered.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i32,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

/// A purchase order with its line items attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderWithItems {
    /// The order itself.
    #[serde(flatten)]
    pub order: PurchaseOrder,
    /// Line items, in insertion order.
    pub items: Vec<PurchaseOrderItem>,
}

/// Input line item when creating a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseOrderItemInput {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Units ordered, must be positive.
    pub quantity: i32,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseOrderInput {
    /// Supplier the order is placed with.
    pub supplier_id: SupplierId,
    /// Date the order was placed; defaults to today.
    pub ordered_date: Option<NaiveDate>,
    /// Expected delivery date.
    pub expected_date: Option<NaiveDate>,
    /// Line items, at least one.
    pub items: Vec<PurchaseOrderItemInput>,
}

/// Filter criteria for listing purchase orders.
#[derive(Debug, Clone, Default)]
pub struct PurchaseOrderFilter {
    /// Exact-match status filter.
    pub status: Option<PurchaseOrderStatus>,
    /// Filter by supplier.
    pub supplier_id: Option<SupplierId>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

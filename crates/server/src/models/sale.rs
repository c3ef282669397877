//! Sale domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{CustomerId, ProductId, SaleId, SaleItemId, TenantId};

/// A recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Customer the sale was made to, if known.
    pub customer_id: Option<CustomerId>,
    /// Date of the sale.
    pub sale_date: NaiveDate,
    /// Total amount across all line items.
    pub total_amount: Decimal,
    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
}

/// A line item on a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    /// Unique line item ID.
    pub id: SaleItemId,
    /// Sale this item belongs to.
    pub sale_id: SaleId,
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit at time of sale.
    pub unit_price: Decimal,
}

/// A sale with its line items attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithItems {
    /// The sale itself.
    #[serde(flatten)]
    pub sale: Sale,
    /// Line items, in insertion order.
    pub items: Vec<SaleItem>,
}

/// Input line item when recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemInput {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold, must be positive.
    pub quantity: i32,
    /// Price per unit; defaults to the product's current unit price.
    pub unit_price: Option<Decimal>,
}

/// Input for recording a sale.
///
/// Recording decrements each product's on-hand quantity in the same
/// transaction that inserts the sale and its items.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    /// Customer the sale was made to, if known.
    pub customer_id: Option<CustomerId>,
    /// Date of the sale; defaults to today.
    pub sale_date: Option<NaiveDate>,
    /// Line items, at least one.
    pub items: Vec<SaleItemInput>,
}

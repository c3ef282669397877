//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, ProductId, SupplierId, TenantId};

/// A product in a tenant's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit, unique within the tenant when set.
    pub sku: Option<String>,
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Units currently on hand, never negative.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Stock level at or below which the product is considered low.
    pub low_stock_threshold: Option<i32>,
    /// Category, if assigned.
    pub category_id: Option<CategoryId>,
    /// Preferred supplier, if assigned.
    pub supplier_id: Option<SupplierId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Initial units on hand.
    #[serde(default)]
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Low stock threshold.
    pub low_stock_threshold: Option<i32>,
    /// Category to assign.
    pub category_id: Option<CategoryId>,
    /// Preferred supplier.
    pub supplier_id: Option<SupplierId>,
}

/// Input for updating a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductInput {
    /// Display name.
    pub name: Option<String>,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Units on hand.
    pub quantity: Option<i32>,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
    /// Category to assign.
    pub category_id: Option<CategoryId>,
    /// Preferred supplier.
    pub supplier_id: Option<SupplierId>,
}

/// Filter criteria for listing products. Each set field narrows the
/// result with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name, SKU, or manufacturer.
    pub search: Option<String>,
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Filter by supplier.
    pub supplier_id: Option<SupplierId>,
    /// Only products currently at or below their low stock threshold,
    /// or out of stock.
    pub alerting_only: bool,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

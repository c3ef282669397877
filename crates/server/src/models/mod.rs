//! Domain models for Stockroom.
//!
//! Plain data types shared between the persistence gateway, the services,
//! and the route handlers. Row types live next to their queries in
//! [`crate::db`]; these are the shapes the rest of the application speaks.

pub mod activity;
pub mod alert;
pub mod analytics;
pub mod batch;
pub mod category;
pub mod customer;
pub mod location;
pub mod product;
pub mod purchase_order;
pub mod sale;
pub mod supplier;
pub mod user;

pub use activity::{ActivityEntry, ActivityFilter};
pub use alert::{AlertSeverity, AlertSummary, AlertType, ReorderRecommendation, StockAlert};
pub use analytics::{DateRange, InventoryAnalytics, SalesAnalytics};
pub use batch::{Batch, BatchFilter, CreateBatchInput, UpdateBatchInput};
pub use category::{Category, CreateCategoryInput};
pub use customer::{CreateCustomerInput, Customer, CustomerFilter, CustomerStatus, UpdateCustomerInput};
pub use location::{CreateLocationInput, Location, UpdateLocationInput};
pub use product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
pub use purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrder, PurchaseOrderFilter, PurchaseOrderItem,
    PurchaseOrderItemInput, PurchaseOrderStatus, PurchaseOrderWithItems,
};
pub use sale::{CreateSaleInput, Sale, SaleItem, SaleItemInput, SaleWithItems};
pub use supplier::{CreateSupplierInput, Supplier, SupplierFilter, UpdateSupplierInput};
pub use user::{CurrentUser, User, session_keys};

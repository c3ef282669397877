//! Database operations for Stockroom `PostgreSQL`.
//!
//! One repository per aggregate, each borrowing the shared [`PgPool`].
//! Every query method takes the owning [`stockroom_core::TenantId`] as its
//! first argument and includes the tenant predicate in SQL — tenant scoping
//! is structural, not a caller convention.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod activity;
pub mod batches;
pub mod categories;
pub mod customers;
pub mod locations;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod suppliers;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use activity::ActivityLogRepository;
pub use batches::BatchRepository;
pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use locations::LocationRepository;
pub use products::ProductRepository;
pub use purchase_orders::PurchaseOrderRepository;
pub use sales::SaleRepository;
pub use suppliers::SupplierRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found for this tenant.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate SKU, insufficient stock).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

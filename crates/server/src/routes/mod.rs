//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/register                   - Create an account
//! POST /auth/login                      - Sign in
//! POST /auth/logout                     - Sign out
//! GET  /auth/me                         - Current session identity
//!
//! # Dashboard
//! GET  /api/dashboard                   - Analytics + alert summary + recent activity
//!
//! # Products
//! GET    /api/products                  - List (page, search, category, supplier, low_stock)
//! POST   /api/products                  - Create
//! GET    /api/products/{id}             - Detail
//! PUT    /api/products/{id}             - Update
//! DELETE /api/products/{id}             - Delete
//! PUT    /api/products/{id}/threshold   - Set or clear the low stock threshold
//!
//! # Stock alerts
//! GET  /api/alerts                      - Current alerts, most urgent first
//! GET  /api/alerts/summary              - Counts for dashboard tiles
//! GET  /api/alerts/reorder              - Reorder recommendations (days param)
//!
//! # Analytics
//! GET  /api/analytics/inventory         - Valuation snapshot
//! GET  /api/analytics/sales             - Sales aggregates (start_date, end_date)
//!
//! # Catalog & partners
//! GET/POST       /api/categories        - List / create
//! PUT/DELETE     /api/categories/{id}   - Rename / delete
//! GET/POST       /api/suppliers         - List (search, industry) / create
//! GET/PUT/DELETE /api/suppliers/{id}    - Detail / update / delete
//! GET/POST       /api/customers         - List (search, status) / create
//! GET/PUT/DELETE /api/customers/{id}    - Detail / update / delete
//! GET/POST       /api/locations         - List / create
//! PUT/DELETE     /api/locations/{id}    - Update / delete
//!
//! # Stock movements
//! GET/POST       /api/batches           - List (product, date range) / receive
//! GET/PUT/DELETE /api/batches/{id}      - Detail / correct / remove
//! GET/POST       /api/sales             - List (date range) / record
//! GET            /api/sales/{id}        - Detail with line items
//! GET/POST       /api/purchase-orders   - List (status, supplier) / create
//! GET            /api/purchase-orders/{id}         - Detail with line items
//! POST           /api/purchase-orders/{id}/place   - Draft -> ordered
//! POST           /api/purchase-orders/{id}/cancel  - Cancel unreceived
//! POST           /api/purchase-orders/{id}/receive - Receive into stock
//!
//! # Activity
//! GET  /api/activity                    - Feed (action, entity_type filters)
//! ```

pub mod activity;
pub mod alerts;
pub mod analytics;
pub mod auth;
pub mod batches;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod locations;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod suppliers;

use axum::{
    Router,
    routing::{get, post, put},
};
use chrono::NaiveDate;

use crate::error::AppError;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/threshold", put(products::set_threshold))
}

/// Create the stock alert routes router.
pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::index))
        .route("/summary", get(alerts::summary))
        .route("/reorder", get(alerts::reorder))
}

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(analytics::inventory))
        .route("/sales", get(analytics::sales))
}

/// Create the catalog and partner routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::index).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::rename).delete(categories::delete),
        )
        .route("/suppliers", get(suppliers::index).post(suppliers::create))
        .route(
            "/suppliers/{id}",
            get(suppliers::show)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
        .route("/customers", get(customers::index).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/locations", get(locations::index).post(locations::create))
        .route(
            "/locations/{id}",
            put(locations::update).delete(locations::delete),
        )
}

/// Create the stock movement routes router.
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(batches::index).post(batches::create))
        .route(
            "/batches/{id}",
            get(batches::show)
                .put(batches::update)
                .delete(batches::delete),
        )
        .route("/sales", get(sales::index).post(sales::create))
        .route("/sales/{id}", get(sales::show))
        .route(
            "/purchase-orders",
            get(purchase_orders::index).post(purchase_orders::create),
        )
        .route("/purchase-orders/{id}", get(purchase_orders::show))
        .route("/purchase-orders/{id}/place", post(purchase_orders::place))
        .route("/purchase-orders/{id}/cancel", post(purchase_orders::cancel))
        .route(
            "/purchase-orders/{id}/receive",
            post(purchase_orders::receive),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/api/dashboard", get(dashboard::index))
        .nest("/api/products", product_routes())
        .nest("/api/alerts", alert_routes())
        .nest("/api/analytics", analytics_routes())
        .nest("/api", catalog_routes())
        .nest("/api", stock_routes())
        .route("/api/activity", get(activity::index))
}

/// Parse an ISO `YYYY-MM-DD` query parameter.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming the parameter when the value
/// doesn't parse.
pub fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|raw| {
            raw.parse::<NaiveDate>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be an ISO date (YYYY-MM-DD)")))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param("start_date", None).unwrap(), None);

        let parsed = parse_date_param("start_date", Some("2026-08-01")).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2026, 8, 1));

        assert!(parse_date_param("start_date", Some("08/01/2026")).is_err());
        assert!(parse_date_param("end_date", Some("not-a-date")).is_err());
    }
}

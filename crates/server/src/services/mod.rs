//! Application services.
//!
//! Services sit between the route handlers and the persistence gateway:
//! they read through the result cache, push aggregation into the
//! gateway's named queries, and keep the shaping logic pure enough to
//! unit test.

pub mod actions;
pub mod alerts;
pub mod analytics;
pub mod auth;

pub use alerts::StockAlertService;
pub use analytics::AnalyticsService;
pub use auth::AuthService;

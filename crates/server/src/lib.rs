//! Stockroom server library.
//!
//! Multi-tenant inventory and retail-operations backend: product catalog,
//! stock levels, batches, suppliers, purchase orders, sales, customers,
//! analytics, and stock alerts — exposed as a JSON API.
//!
//! Exposed as a library so handlers and services can be tested and reused
//! by the CLI and the integration test crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod state;

//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and migrate
//! cargo run -p stockroom-cli -- migrate
//!
//! # Start the server
//! cargo run -p stockroom-server
//!
//! # Run integration tests
//! cargo test -p stockroom-integration-tests -- --ignored
//! ```
//!
//! Each test registers its own throwaway account, so tests are
//! independent and also exercise tenant isolation against each other.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOCKROOM_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store for session auth.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a fresh account and return the signed-in client.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn signed_in_client(label: &str) -> Client {
    let client = client();
    let email = format!("{label}-{}@stockroom.test", std::process::id());

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "name": format!("Test {label}"),
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to register test account");
    assert!(
        resp.status().is_success(),
        "registration failed: {}",
        resp.status()
    );

    client
}

/// Create a product via the API and return the response body.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(client: &Client, body: Value) -> Value {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to create product");
    assert!(resp.status().is_success());

    resp.json().await.expect("Failed to parse response")
}

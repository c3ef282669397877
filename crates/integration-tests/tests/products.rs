//! Integration tests for product management.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated via stockroom-cli)
//! - The server running (cargo run -p stockroom-server)
//!
//! Run with: cargo test -p stockroom-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_integration_tests::{base_url, client, create_product, signed_in_client};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_crud_roundtrip() {
    let client = signed_in_client("product-crud").await;
    let base_url = base_url();

    // Create
    let result = create_product(
        &client,
        json!({
            "name": "Impact Driver",
            "sku": "IMP-001",
            "quantity": 12,
            "unit_price": "129.99",
            "low_stock_threshold": 4
        }),
    )
    .await;
    assert_eq!(result["success"], true);

    // List should contain it
    let resp = client
        .get(format!("{base_url}/api/products?search=Impact"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = resp.json().await.expect("Failed to parse page");
    assert!(page["total"].as_i64().unwrap_or(0) >= 1);
    assert_eq!(page["page"], 1);

    let id = page["items"][0]["id"].as_i64().expect("missing product id");

    // Update
    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({ "quantity": 20 }))
        .send()
        .await
        .expect("Failed to update product");
    let result: Value = resp.json().await.expect("Failed to parse result");
    assert_eq!(result["success"], true);

    // Detail reflects the update
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    let product: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(product["quantity"], 20);

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    let result: Value = resp.json().await.expect("Failed to parse result");
    assert_eq!(result["success"], true);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_validation_errors_are_per_field() {
    let client = signed_in_client("product-validation").await;

    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "",
            "quantity": -5,
            "unit_price": "-1.00"
        }))
        .send()
        .await
        .expect("Failed to post product");

    let result: Value = resp.json().await.expect("Failed to parse result");
    assert_eq!(result["success"], false);
    assert!(result["errors"]["name"].is_array());
    assert!(result["errors"]["quantity"].is_array());
    assert!(result["errors"]["unit_price"].is_array());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_sku_rejected_within_tenant() {
    let client = signed_in_client("product-sku").await;

    let first = create_product(
        &client,
        json!({ "name": "Wrench", "sku": "WR-9", "unit_price": "10.00" }),
    )
    .await;
    assert_eq!(first["success"], true);

    let second = create_product(
        &client,
        json!({ "name": "Other Wrench", "sku": "WR-9", "unit_price": "12.00" }),
    )
    .await;
    assert_eq!(second["success"], false);
    assert!(second["errors"]["sku"].is_array());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unauthenticated_api_requests_get_401() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

//! Integration tests for the analytics engine and cache invalidation.
//!
//! Run with: cargo test -p stockroom-integration-tests -- --ignored

use serde_json::{Value, json};

use stockroom_integration_tests::{base_url, create_product, signed_in_client};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_tenant_analytics_are_zero() {
    let client = signed_in_client("analytics-empty").await;

    let resp = client
        .get(format!("{}/api/analytics/inventory", base_url()))
        .send()
        .await
        .expect("Failed to get analytics");
    let snapshot: Value = resp.json().await.expect("Failed to parse snapshot");

    assert_eq!(snapshot["total_products"], 0);
    assert_eq!(snapshot["total_value"], "0");
    assert_eq!(snapshot["low_stock_count"], 0);
    assert_eq!(snapshot["out_of_stock_count"], 0);
    assert_eq!(
        snapshot["value_by_category"],
        serde_json::json!({}),
        "empty tenant should have an empty category map"
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_mutation_invalidates_analytics_within_ttl() {
    let client = signed_in_client("analytics-invalidation").await;
    let base_url = base_url();

    // Prime the analytics cache on an empty catalog
    let resp = client
        .get(format!("{base_url}/api/analytics/inventory"))
        .send()
        .await
        .expect("Failed to get analytics");
    let before: Value = resp.json().await.expect("Failed to parse snapshot");
    assert_eq!(before["total_products"], 0);

    // 4 units at 2.50 = 10.00 total value
    create_product(
        &client,
        json!({ "name": "Fresh Stock", "quantity": 4, "unit_price": "2.50" }),
    )
    .await;

    // Well within the 120s analytics TTL, so only tag invalidation can
    // explain a fresh result
    let resp = client
        .get(format!("{base_url}/api/analytics/inventory"))
        .send()
        .await
        .expect("Failed to get analytics");
    let after: Value = resp.json().await.expect("Failed to parse snapshot");
    assert_eq!(after["total_products"], 1);
    assert_eq!(after["total_value"], "10.00");
    assert_eq!(after["value_by_category"]["Uncategorized"], "10.00");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sales_flow_adjusts_stock_and_revenue() {
    let client = signed_in_client("analytics-sales").await;
    let base_url = base_url();

    create_product(
        &client,
        json!({ "name": "Sellable", "sku": "SELL-1", "quantity": 10, "unit_price": "3.00" }),
    )
    .await;

    let resp = client
        .get(format!("{base_url}/api/products?search=SELL-1"))
        .send()
        .await
        .expect("Failed to find product");
    let page: Value = resp.json().await.expect("Failed to parse page");
    let id = page["items"][0]["id"].as_i64().expect("missing id");

    // Sell 4 units at the current price
    let resp = client
        .post(format!("{base_url}/api/sales"))
        .json(&json!({ "items": [{ "product_id": id, "quantity": 4 }] }))
        .send()
        .await
        .expect("Failed to record sale");
    let result: Value = resp.json().await.expect("Failed to parse result");
    assert_eq!(result["success"], true);

    // Stock went down atomically with the sale
    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    let product: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(product["quantity"], 6);

    // Revenue shows up in sales analytics
    let resp = client
        .get(format!("{base_url}/api/analytics/sales"))
        .send()
        .await
        .expect("Failed to get sales analytics");
    let analytics: Value = resp.json().await.expect("Failed to parse analytics");
    assert_eq!(analytics["total_sales"], 1);
    assert_eq!(analytics["total_revenue"], "12.00");
    assert_eq!(analytics["recent"].as_array().expect("array").len(), 1);

    // Overselling is rejected and changes nothing
    let resp = client
        .post(format!("{base_url}/api/sales"))
        .json(&json!({ "items": [{ "product_id": id, "quantity": 100 }] }))
        .send()
        .await
        .expect("Failed to post oversell");
    let result: Value = resp.json().await.expect("Failed to parse result");
    assert_eq!(result["success"], false);

    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to get product");
    let product: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(product["quantity"], 6, "failed sale must not touch stock");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sales_range_is_inclusive_and_validated() {
    let client = signed_in_client("analytics-range").await;
    let base_url = base_url();

    // Bad date format is a 400, not a 500
    let resp = client
        .get(format!("{base_url}/api/analytics/sales?start_date=08/01/2026"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    // Inverted range is rejected
    let resp = client
        .get(format!(
            "{base_url}/api/analytics/sales?start_date=2026-08-02&end_date=2026-08-01"
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

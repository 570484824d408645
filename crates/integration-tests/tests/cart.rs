//! Cart endpoints over HTTP.

use reqwest::StatusCode;
use serde_json::json;

use storekeep_integration_tests::TestContext;

#[tokio::test]
async fn test_cart_requires_auth() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing authorization token");
}

#[tokio::test]
async fn test_add_merges_and_view_is_enriched() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;

    let (status, body) = ctx
        .post("/cart/add", Some(&token), json!({"productId": 2, "quantity": 2}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added to cart");

    let (_, body) = ctx
        .post("/cart/add", Some(&token), json!({"productId": 2, "quantity": 3}))
        .await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["items"][0]["quantity"], 5);

    let (status, body) = ctx.get("/cart", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["product"]["name"], "Mouse");
}

#[tokio::test]
async fn test_add_checks_product_and_stock() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;

    let (status, body) = ctx
        .post("/cart/add", Some(&token), json!({"productId": 42, "quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = ctx
        .post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 11}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient stock");

    let (status, body) = ctx
        .post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed: Quantity must be at least 1");
}

#[tokio::test]
async fn test_deleted_product_shows_as_null() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;
    let admin = ctx.admin().await;

    ctx.post("/cart/add", Some(&token), json!({"productId": 3, "quantity": 1}))
        .await;
    ctx.delete("/products/3", Some(&admin)).await;

    let (_, body) = ctx.get("/cart", Some(&token)).await;
    assert_eq!(body["data"]["items"][0]["productId"], 3);
    assert!(body["data"]["items"][0]["product"].is_null());
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 1}))
        .await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 2, "quantity": 1}))
        .await;

    // Absent line is a no-op
    let (status, body) = ctx.delete("/cart/remove/3", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));

    let (_, body) = ctx.delete("/cart/remove/1", Some(&token)).await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    let (status, _) = ctx.delete("/cart/remove/one", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx.delete("/cart", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart cleared");
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn test_carts_are_private() {
    let ctx = TestContext::new().await;
    let ada = ctx.shopper("ada@example.com").await;
    let bob = ctx.shopper("bob@example.com").await;

    ctx.post("/cart/add", Some(&ada), json!({"productId": 1, "quantity": 1}))
        .await;

    let (_, body) = ctx.get("/cart", Some(&bob)).await;
    assert_eq!(body["data"]["items"], json!([]));
}

//! Order placement over HTTP.

use reqwest::StatusCode;
use serde_json::json;

use storekeep_integration_tests::TestContext;

/// Create a product as admin and return its id.
async fn create_product(ctx: &TestContext, admin: &str, body: serde_json::Value) -> i32 {
    let (status, created) = ctx.post("/products", Some(admin), body).await;
    assert_eq!(status, StatusCode::CREATED, "product creation failed: {created}");

    let id = created["data"]["id"].as_i64().expect("created product has an id");
    i32::try_from(id).expect("product id fits in i32")
}

#[tokio::test]
async fn test_place_order() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 1}))
        .await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 2, "quantity": 3}))
        .await;

    let (status, body) = ctx.post("/orders", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["data"]["orderId"], 1);
    assert_eq!(body["data"]["totalAmount"], "1089.96");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["items"][1]["productName"], "Mouse");
    assert_eq!(body["data"]["items"][1]["unitPrice"], "29.99");
    assert_eq!(body["data"]["items"][1]["subtotal"], "89.97");

    assert_eq!(ctx.stock(1), 9);
    assert_eq!(ctx.stock(2), 47);

    let (_, cart) = ctx.get("/cart", Some(&token)).await;
    assert_eq!(cart["data"]["items"], json!([]));
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;

    let (status, body) = ctx.post("/orders", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cart is empty");

    let (_, orders) = ctx.get("/orders", Some(&token)).await;
    assert_eq!(orders["count"], 0);
}

#[tokio::test]
async fn test_failed_order_changes_nothing() {
    let ctx = TestContext::new().await;
    let token = ctx.shopper("ada@example.com").await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 2, "quantity": 5}))
        .await;
    // Each add passes on its own; the merged 12 exceeds the laptop's 10
    ctx.post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 6}))
        .await;
    ctx.post("/cart/add", Some(&token), json!({"productId": 1, "quantity": 6}))
        .await;

    let (status, body) = ctx.post("/orders", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient stock for Laptop");
    assert_eq!(ctx.stock(2), 50);
    assert_eq!(ctx.stock(1), 10);

    let (_, cart) = ctx.get("/cart", Some(&token)).await;
    assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(2));
    let (_, orders) = ctx.get("/orders", Some(&token)).await;
    assert_eq!(orders["count"], 0);
}

#[tokio::test]
async fn test_orders_are_private() {
    let ctx = TestContext::new().await;
    let ada = ctx.shopper("ada@example.com").await;
    let bob = ctx.shopper("bob@example.com").await;
    ctx.post("/cart/add", Some(&ada), json!({"productId": 3, "quantity": 1}))
        .await;
    ctx.post("/orders", Some(&ada), json!({})).await;

    let (status, body) = ctx.get("/orders", Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = ctx.get("/orders/1", Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["productName"], "Keyboard");

    let (_, body) = ctx.get("/orders", Some(&bob)).await;
    assert_eq!(body["count"], 0);

    let (status, body) = ctx.get("/orders/1", Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn test_concurrent_orders_for_last_unit() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let id = create_product(&ctx, &admin, json!({
        "name": "Last one",
        "description": "Only one left",
        "price": 5,
        "stock": 1
    }))
    .await;

    let ada = ctx.shopper("ada@example.com").await;
    let bob = ctx.shopper("bob@example.com").await;
    for token in [&ada, &bob] {
        let (status, _) = ctx
            .post("/cart/add", Some(token), json!({"productId": id, "quantity": 1}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (first, second) = tokio::join!(
        ctx.post("/orders", Some(&ada), json!({})),
        ctx.post("/orders", Some(&bob), json!({})),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(ctx.stock(id), 0);
}

#[tokio::test]
async fn test_oversized_total_is_rejected_without_side_effects() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin().await;
    let mut ids = Vec::new();
    for name in ["Crown", "Sceptre"] {
        let body = json!({
            "name": name,
            "description": "Collector's item",
            "price": "50000000000000000000000000000",
            "stock": 5
        });
        ids.push(create_product(&ctx, &admin, body).await);
    }

    let token = ctx.shopper("ada@example.com").await;
    for id in &ids {
        let (status, _) = ctx
            .post("/cart/add", Some(&token), json!({"productId": id, "quantity": 1}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = ctx.post("/orders", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order total is too large");
    for id in &ids {
        assert_eq!(ctx.stock(*id), 5);
    }
    let (_, cart) = ctx.get("/cart", Some(&token)).await;
    assert_eq!(cart["data"]["items"].as_array().map(Vec::len), Some(2));
    let (_, orders) = ctx.get("/orders", Some(&token)).await;
    assert_eq!(orders["count"], 0);
}

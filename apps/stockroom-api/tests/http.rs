//! HTTP integration tests.
//!
//! Starts the axum app on an ephemeral port and exercises it with reqwest.

use serde_json::{json, Value};
use stockroom_api::app;
use stockroom_core::RestorePolicy;
use stockroom_db::{Database, DbConfig};

/// Bind to port 0 and return the base URL.
async fn start_server() -> String {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(db, RestorePolicy::FirstItem))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn create_product(client: &reqwest::Client, base: &str, name: &str, quantity: i64) -> Value {
    let resp = client
        .post(format!("{base}/products"))
        .json(&json!({ "name": name, "quantity": quantity }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

async fn stock(client: &reqwest::Client, base: &str, id: &str) -> i64 {
    let product: Value = client
        .get(format!("{base}/products/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    product["quantity"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_probe() {
    let base = start_server().await;
    let resp = reqwest::get(format!("{base}/")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_product_lifecycle() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create_product(&client, &base, "Widget-X", 50).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Widget-X");
    assert_eq!(created["quantity"], 50);

    let list: Value = client
        .get(format!("{base}/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["products"].as_array().unwrap().len(), 1);
    assert_eq!(list["products"][0]["id"], id.as_str());

    let resp = client
        .put(format!("{base}/products/{id}"))
        .json(&json!({ "name": "Widget-Y", "quantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Widget-Y");
    assert_eq!(updated["quantity"], 7);

    let resp = client.delete(format!("{base}/products/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.get(format!("{base}/products/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "err": { "code": "invalid_data", "message": "Wrong id format" } })
    );
}

#[tokio::test]
async fn test_product_validation_errors() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let cases = [
        (
            json!({ "name": "abcd", "quantity": 1 }),
            "\"name\" length must be at least 5 characters long",
        ),
        (
            json!({ "name": "Widget-X", "quantity": 0 }),
            "\"quantity\" must be larger than or equal to 1",
        ),
        (
            json!({ "name": "Widget-X", "quantity": "five" }),
            "\"quantity\" must be a number",
        ),
    ];

    for (payload, message) in cases {
        let resp = client
            .post(format!("{base}/products"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["err"]["code"], "invalid_data");
        assert_eq!(body["err"]["message"], message);
    }

    create_product(&client, &base, "Widget-X", 1).await;
    let resp = client
        .post(format!("{base}/products"))
        .json(&json!({ "name": "Widget-X", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["err"]["message"], "Product already exists");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/products"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_sale_flow() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &base, "Widget-X", 10).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/sales"))
        .json(&json!([{ "productId": product_id, "quantity": 4 }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let sale: Value = resp.json().await.unwrap();
    let sale_id = sale["id"].as_str().unwrap().to_string();
    assert_eq!(sale["items"], json!([{ "productId": product_id, "quantity": 4 }]));
    assert_eq!(stock(&client, &base, &product_id).await, 6);

    let list: Value = client
        .get(format!("{base}/sales"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["sales"].as_array().unwrap().len(), 1);

    let resp = client
        .put(format!("{base}/sales/{sale_id}"))
        .json(&json!([{ "productId": product_id, "quantity": 2 }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(stock(&client, &base, &product_id).await, 6);

    let resp = client.delete(format!("{base}/sales/{sale_id}")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(stock(&client, &base, &product_id).await, 8);

    let resp = client.get(format!("{base}/sales/{sale_id}")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "err": { "code": "not_found", "message": "Sale not found" } })
    );
}

#[tokio::test]
async fn test_sale_errors() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &base, "Widget-X", 3).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/sales"))
        .json(&json!([{ "productId": product_id, "quantity": 5 }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "err": { "code": "stock_problem", "message": "Such amount is not permitted to sell" }
        })
    );

    let resp = client
        .post(format!("{base}/sales"))
        .json(&json!([{ "productId": "nope", "quantity": 1 }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["err"]["message"], "Wrong product ID or invalid quantity");

    let resp = client
        .delete(format!("{base}/sales/not-a-sale"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["err"]["message"], "Wrong sale ID format");

    assert_eq!(stock(&client, &base, &product_id).await, 3);
}

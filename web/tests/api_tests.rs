//! Handler-level API tests over the in-memory store.
//!
//! These exercise the full router (serialization, status codes, error
//! mapping) without a database.

use axum_test::TestServer;
use http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use storevoice_core::MemoryInventoryStore;
use storevoice_web::{router, AppState};

fn server_with(store: Arc<MemoryInventoryStore>) -> TestServer {
    let app = router(AppState::new(store));
    TestServer::new(app).expect("test server starts")
}

fn empty_server() -> TestServer {
    server_with(Arc::new(MemoryInventoryStore::new()))
}

#[tokio::test]
async fn banner_and_health() {
    let server = empty_server();

    let banner = server.get("/").await;
    banner.assert_status(StatusCode::OK);
    let body: Value = banner.json();
    assert_eq!(body["message"], "Inventory Management API");

    let health = server.get("/health").await;
    health.assert_status(StatusCode::OK);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn create_returns_201_and_duplicate_400() {
    let server = empty_server();

    let created = server
        .post("/stocks")
        .json(&json!({"item_name": "Coke", "quantity": 10, "unit": "bottles"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["item_name"], "Coke");
    assert_eq!(body["quantity"], 10);
    assert!(body["id"].is_number());

    let duplicate = server
        .post("/stocks")
        .json(&json!({"item_name": "COKE", "quantity": 1, "unit": "bottles"}))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_negative_quantity() {
    let server = empty_server();
    let response = server
        .post("/stocks")
        .json(&json!({"item_name": "Coke", "quantity": -1, "unit": "bottles"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_by_id_404_when_missing() {
    let server = empty_server();
    let response = server.get("/stocks/99").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Stock item with ID 99 not found");
}

#[tokio::test]
async fn search_and_low_stock() {
    let store = Arc::new(MemoryInventoryStore::new());
    store.seed_item("Coke", 3, "bottles");
    store.seed_item("Lays", 25, "packets");
    let server = server_with(store);

    let search = server.get("/stocks/search/ok").await;
    search.assert_status(StatusCode::OK);
    let hits: Vec<Value> = search.json();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["item_name"], "Coke");

    let low = server.get("/stocks/low-stock/10").await;
    low.assert_status(StatusCode::OK);
    let items: Vec<Value> = low.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["item_name"], "Coke");
}

#[tokio::test]
async fn update_partial_fields_and_empty_body() {
    let store = Arc::new(MemoryInventoryStore::new());
    let id = store.seed_item("Coke", 10, "bottles");
    let server = server_with(store);

    let updated = server
        .put(&format!("/stocks/{id}"))
        .json(&json!({"quantity": 4}))
        .await;
    updated.assert_status(StatusCode::OK);
    let body: Value = updated.json();
    assert_eq!(body["quantity"], 4);
    assert_eq!(body["item_name"], "Coke");

    let empty = server.put(&format!("/stocks/{id}")).json(&json!({})).await;
    empty.assert_status(StatusCode::BAD_REQUEST);

    let missing = server
        .put("/stocks/9999")
        .json(&json!({"quantity": 4}))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_confirms_and_404s_after() {
    let store = Arc::new(MemoryInventoryStore::new());
    let id = store.seed_item("Coke", 10, "bottles");
    let server = server_with(store);

    let deleted = server.delete(&format!("/stocks/{id}")).await;
    deleted.assert_status(StatusCode::OK);
    let body: Value = deleted.json();
    assert_eq!(
        body["message"],
        format!("Stock item 'Coke' (ID: {id}) deleted successfully")
    );

    let gone = server.delete(&format!("/stocks/{id}")).await;
    gone.assert_status(StatusCode::NOT_FOUND);
}

// The worked example from the API docs: create 10, restock to 15, fail an
// over-purchase without touching stock, then drain to zero.
#[tokio::test]
async fn widget_purchase_walkthrough() {
    let server = empty_server();

    let created = server
        .post("/stocks")
        .json(&json!({"item_name": "Widget", "quantity": 10, "unit": "pieces"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_i64().expect("id assigned");

    let restocked = server
        .post(&format!("/stocks/{id}/add-quantity"))
        .json(&json!({"quantity_to_add": 5}))
        .await;
    restocked.assert_status(StatusCode::OK);
    assert_eq!(restocked.json::<Value>()["quantity"], 15);

    let over = server
        .post("/purchase")
        .json(&json!({"item_id": id, "quantity": 20}))
        .await;
    over.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = over.json();
    assert_eq!(body["message"], "Insufficient stock. Available: 15, Requested: 20");

    let unchanged = server.get(&format!("/stocks/{id}")).await;
    assert_eq!(unchanged.json::<Value>()["quantity"], 15);

    let drained = server
        .post("/purchase")
        .json(&json!({"item_id": id, "quantity": 15}))
        .await;
    drained.assert_status(StatusCode::OK);
    let body: Value = drained.json();
    assert_eq!(body["remaining_quantity"], 0);
    assert_eq!(body["purchased_quantity"], 15);
    assert_eq!(body["message"], "Successfully purchased 15 pieces of Widget");
}

#[tokio::test]
async fn add_quantity_rejects_non_positive_and_missing() {
    let store = Arc::new(MemoryInventoryStore::new());
    let id = store.seed_item("Coke", 10, "bottles");
    let server = server_with(store);

    let zero = server
        .post(&format!("/stocks/{id}/add-quantity"))
        .json(&json!({"quantity_to_add": 0}))
        .await;
    zero.assert_status(StatusCode::BAD_REQUEST);

    let missing = server
        .post("/stocks/9999/add-quantity")
        .json(&json!({"quantity_to_add": 5}))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_missing_item_is_404() {
    let server = empty_server();
    let response = server
        .post("/purchase")
        .json(&json!({"item_id": 1, "quantity": 1}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

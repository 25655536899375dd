mod support;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use storefront_service::build_router;
use support::{request, send, test_state, MemoryStore, StubGateway};

fn app() -> (Arc<MemoryStore>, axum::Router) {
    let store = Arc::new(MemoryStore::default());
    let app = build_router(test_state(&store, Arc::new(StubGateway::approving("unused"))));
    (store, app)
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let (_store, app) = app();

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/products/create",
            None,
            Some(json!({"name": "Product 1", "price": "10.99"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Product 1");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, request("GET", "/products", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        request(
            "PUT",
            &format!("/products/{id}/update"),
            None,
            Some(json!({"name": "Product 1", "price": "12.99", "active": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "12.99");

    let (status, body) =
        send(&app, request("DELETE", &format!("/products/{id}/delete"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (_, listed) = send(&app, request("GET", "/products", None, None)).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn mutating_a_missing_product_is_404() {
    let (_store, app) = app();
    let id = Uuid::new_v4();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/products/{id}/update"),
            None,
            Some(json!({"name": "Ghost", "price": "1.00"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) =
        send(&app, request("DELETE", &format!("/products/{id}/delete"), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inactive_products_are_not_listed() {
    let (store, app) = app();

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/products/create",
            None,
            Some(json!({"name": "Hidden", "price": "5.00", "active": false})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["active"], false);
    assert_eq!(store.products.lock().unwrap().len(), 1);

    let (_, listed) = send(&app, request("GET", "/products", None, None)).await;
    assert_eq!(listed, json!([]));
}

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shop_api::{app, apply_migrations, db, seed, AppState};
use tower::ServiceExt;

async fn setup() -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    apply_migrations(&pool).await.unwrap();
    app(AppState::new(pool))
}

async fn setup_seeded() -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    apply_migrations(&pool).await.unwrap();
    seed(&pool).await.unwrap();
    app(AppState::new(pool))
}

async fn call(router: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json");
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

async fn call_raw(router: &Router, method: &str, path: &str, body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

// ── Customers ──

#[tokio::test]
async fn customer_create_get_delete_then_not_found() {
    let r = setup().await;
    let (s, created) = call(
        &r,
        "POST",
        "/api/v1/customers",
        Some(json!({"name": "John", "surname": "Doe", "email": "john@x.com"})),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let (s, got) = call(&r, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(got, created);
    assert_eq!(got["name"], "John");
    assert_eq!(got["surname"], "Doe");
    assert_eq!(got["email"], "john@x.com");

    let (s, body) = call(&r, "DELETE", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");

    let (s, body) = call(&r, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let r = setup().await;
    let (s, body) = call(&r, "GET", "/api/v1/customers/abc", None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID");

    for (method, path) in [
        ("PUT", "/api/v1/orders/abc"),
        ("DELETE", "/api/v1/shopitems/-1"),
        ("GET", "/api/v1/categories/0"),
    ] {
        let (s, _) = call(&r, method, path, Some(json!({}))).await;
        assert_eq!(s, StatusCode::BAD_REQUEST, "{method} {path}");
    }
}

#[tokio::test]
async fn duplicate_email_is_internal_error() {
    let r = setup().await;
    let body = json!({"name": "A", "surname": "B", "email": "same@x.com"});
    let (s, _) = call(&r, "POST", "/api/v1/customers", Some(body.clone())).await;
    assert_eq!(s, StatusCode::CREATED);
    let (s, err) = call(&r, "POST", "/api/v1/customers", Some(body)).await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err["error"], "Failed to create customer");
}

#[tokio::test]
async fn malformed_body_is_bad_request_with_error_field() {
    let r = setup().await;
    let (s, body) = call_raw(&r, "POST", "/api/v1/customers", "{not json").await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

    let (s, _) = call(&r, "POST", "/api/v1/customers", Some(json!({"name": "Only"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_ids_are_not_found_except_delete() {
    let r = setup().await;
    let (s, _) = call(&r, "GET", "/api/v1/customers/999", None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (s, _) = call(
        &r,
        "PUT",
        "/api/v1/customers/999",
        Some(json!({"name": "A", "surname": "B", "email": "a@b.c"})),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    // Existence is checked before the body is decoded.
    let (s, _) = call_raw(&r, "PUT", "/api/v1/customers/999", "garbage").await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (s, body) = call(&r, "DELETE", "/api/v1/customers/999", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    let r = setup().await;
    let (_, created) = call(
        &r,
        "POST",
        "/api/v1/categories",
        Some(json!({"title": "Books", "description": "Paper"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (s, updated) = call(
        &r,
        "PUT",
        &format!("/api/v1/categories/{id}"),
        Some(json!({"id": id + 100, "title": "Novels"})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Novels");
    assert_eq!(updated["description"], Value::Null);

    let (s, _) = call(&r, "PUT", &format!("/api/v1/categories/{id}"), Some(json!({"description": "x"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_counts_creates_minus_deletes() {
    let r = setup().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        let (_, c) = call(
            &r,
            "POST",
            "/api/v1/categories",
            Some(json!({"title": format!("Cat {i}")})),
        )
        .await;
        ids.push(c["id"].as_i64().unwrap());
    }
    for id in &ids[..2] {
        call(&r, "DELETE", &format!("/api/v1/categories/{id}"), None).await;
    }
    let (s, list) = call(&r, "GET", "/api/v1/categories", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 3);
}

// ── Shop items ──

#[tokio::test]
async fn shop_item_without_categories_lists_empty_collection() {
    let r = setup().await;
    let (s, created) = call(&r, "POST", "/api/v1/shopitems", Some(json!({"title": "Widget", "price": 9.99}))).await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(created["price"], 9.99);

    let (s, list) = call(&r, "GET", "/api/v1/shopitems", None).await;
    assert_eq!(s, StatusCode::OK);
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Widget");
    assert_eq!(items[0]["categories"], json!([]));
}

#[tokio::test]
async fn nested_categories_in_body_are_ignored() {
    let r = setup().await;
    let (s, created) = call(
        &r,
        "POST",
        "/api/v1/shopitems",
        Some(json!({
            "title": "Widget",
            "price": 1.0,
            "categories": [{"title": "Sneaky"}]
        })),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(created["categories"], json!([]));
    let (_, cats) = call(&r, "GET", "/api/v1/categories", None).await;
    assert_eq!(cats, json!([]));
}

#[tokio::test]
async fn category_links_attach_and_detach() {
    let r = setup().await;
    let (_, item) = call(&r, "POST", "/api/v1/shopitems", Some(json!({"title": "Lamp", "price": 30}))).await;
    let (_, cat) = call(&r, "POST", "/api/v1/categories", Some(json!({"title": "Home"}))).await;
    let item_id = item["id"].as_i64().unwrap();
    let cat_id = cat["id"].as_i64().unwrap();
    let link = format!("/api/v1/shopitems/{item_id}/categories/{cat_id}");

    let (s, linked) = call(&r, "PUT", &link, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(linked["categories"][0]["title"], "Home");
    let (_, again) = call(&r, "PUT", &link, None).await;
    assert_eq!(again["categories"].as_array().unwrap().len(), 1);

    let (_, got) = call(&r, "GET", &format!("/api/v1/shopitems/{item_id}"), None).await;
    assert_eq!(got["categories"][0]["id"], cat_id);

    let (s, _) = call(&r, "PUT", &format!("/api/v1/shopitems/{item_id}/categories/999"), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (s, unlinked) = call(&r, "DELETE", &link, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(unlinked["categories"], json!([]));
}

#[tokio::test]
async fn deleting_linked_shop_item_succeeds() {
    let r = setup_seeded().await;
    let (_, items) = call(&r, "GET", "/api/v1/shopitems", None).await;
    let phone = items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["title"] == "Smartphone")
        .unwrap()
        .clone();
    assert_eq!(phone["categories"][0]["title"], "Electronics");

    let (s, _) = call(&r, "DELETE", &format!("/api/v1/shopitems/{}", phone["id"]), None).await;
    assert_eq!(s, StatusCode::OK);
    let (_, items) = call(&r, "GET", "/api/v1/shopitems", None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

// ── Orders ──

#[tokio::test]
async fn order_lifecycle_with_items() {
    let r = setup_seeded().await;
    let (_, customers) = call(&r, "GET", "/api/v1/customers", None).await;
    assert_eq!(customers.as_array().unwrap().len(), 2);
    let customer_id = customers[0]["id"].as_i64().unwrap();
    let (_, items) = call(&r, "GET", "/api/v1/shopitems", None).await;
    let shop_item_id = items[0]["id"].as_i64().unwrap();

    let (s, order) = call(
        &r,
        "POST",
        "/api/v1/orders",
        Some(json!({"customer_id": customer_id, "items": [{"shop_item_id": shop_item_id, "quantity": 5}]})),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order, json!({"id": order_id, "customer_id": customer_id}));

    // Nested items were not created implicitly.
    let items_path = format!("/api/v1/orders/{order_id}/items");
    let (s, order_items) = call(&r, "GET", &items_path, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(order_items, json!([]));

    let (s, added) = call(
        &r,
        "POST",
        &items_path,
        Some(json!({"shop_item_id": shop_item_id, "quantity": 2})),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(added["order_id"], order_id);
    assert_eq!(added["quantity"], 2);

    let (_, order_items) = call(&r, "GET", &items_path, None).await;
    assert_eq!(order_items.as_array().unwrap().len(), 1);

    let (s, _) = call(&r, "DELETE", &format!("/api/v1/orders/{order_id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    let (s, _) = call(&r, "GET", &items_path, None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_for_unknown_customer_is_rejected_by_storage() {
    let r = setup().await;
    let (s, body) = call(&r, "POST", "/api/v1/orders", Some(json!({"customer_id": 12345}))).await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create order");
}

#[tokio::test]
async fn customer_with_orders_cannot_be_deleted() {
    let r = setup_seeded().await;
    let (_, customers) = call(&r, "GET", "/api/v1/customers", None).await;
    let customer_id = customers[0]["id"].as_i64().unwrap();
    call(&r, "POST", "/api/v1/orders", Some(json!({"customer_id": customer_id}))).await;

    let (s, body) = call(&r, "DELETE", &format!("/api/v1/customers/{customer_id}"), None).await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to delete customer");
}

#[tokio::test]
async fn order_items_of_unknown_order_are_not_found() {
    let r = setup().await;
    let (s, _) = call(&r, "GET", "/api/v1/orders/77/items", None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    let (s, _) = call(&r, "DELETE", "/api/v1/orders/77/items/1", None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

// ── Operational ──

#[tokio::test]
async fn health_ready_and_openapi() {
    let r = setup().await;
    let (s, body) = call(&r, "GET", "/health", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (s, body) = call(&r, "GET", "/ready", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    assert_eq!(body["missing_tables"], json!([]));

    let (s, body) = call(&r, "GET", "/version", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["name"], "shop-api");

    let (s, doc) = call(&r, "GET", "/api/v1/openapi.json", None).await;
    assert_eq!(s, StatusCode::OK);
    assert!(doc["components"]["schemas"]["ShopItem"].is_object());
}

#[tokio::test]
async fn ready_reports_tables_missing_before_migration() {
    let pool = db::connect_in_memory().await.unwrap();
    let r = app(AppState::new(pool));
    let (s, body) = call(&r, "GET", "/ready", None).await;
    assert_eq!(s, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["missing_tables"].as_array().unwrap().len(), 6);
    assert_eq!(body["missing_tables"][0], "customers");
}

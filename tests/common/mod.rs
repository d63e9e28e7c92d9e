#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use inventory_api::{app, database, AppState};

/// Build the full router against a fresh in-memory database. Each test gets
/// its own isolated store; a single connection keeps the memory DB alive.
pub async fn test_app() -> Router {
    let pool = database::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    app(AppState { pool })
}

/// Drive one request through the router and decode the JSON body (Null when
/// the body is empty).
pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Register a user and return their bearer token.
pub async fn register(app: &Router, username: &str) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({ "username": username, "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body["data"]["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

/// Create a category and return its payload.
pub async fn create_category(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = request(
        app,
        Method::POST,
        "/categories",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create category failed: {}", body);
    body["data"].clone()
}

/// Create an item in a category and return its payload.
pub async fn create_item(
    app: &Router,
    token: &str,
    name: &str,
    category_id: &str,
    quantity: i64,
    price: f64,
) -> Value {
    let (status, body) = request(
        app,
        Method::POST,
        "/items",
        Some(token),
        Some(json!({
            "name": name,
            "categoryId": category_id,
            "quantity": quantity,
            "price": price,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create item failed: {}", body);
    body["data"].clone()
}

//! HTTP API tests driven through the router with `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use fieldsql::config::ServerConfig;
use fieldsql::field_catalog::FieldCatalog;
use fieldsql::server::{router, AppState};

use super::sample_catalog_path;

fn app() -> Router {
    let catalog =
        FieldCatalog::from_csv_path(sample_catalog_path()).expect("sample catalog should load");
    router(Arc::new(AppState::new(catalog, ServerConfig::default())))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fieldsql");
}

#[tokio::test]
async fn test_generate_query_success() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/generate-query",
            r#"{"description": "get user emails", "system": "system_a"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "SELECT users.email FROM users u");
    assert_eq!(body["matched_fields"][0]["column_name"], "email");
    assert_eq!(body["matched_fields"][0]["system_field"], "usr_email");
    assert_eq!(body["joins_used"].as_array().map(Vec::len), Some(0));
    assert!(body["confidence"].as_f64().unwrap() > 0.0);
    assert!(body["processing_time_ms"].is_u64());
}

#[tokio::test]
async fn test_generate_query_with_limit() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/generate-query",
            r#"{"description": "count total orders", "limit": 5}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["query"],
        "SELECT COUNT(orders.total_amount) FROM orders o LIMIT 5"
    );
}

#[tokio::test]
async fn test_missing_description_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/generate-query", r#"{"limit": 5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request format: "));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/generate-query", "{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "InvalidRequest");
}

#[tokio::test]
async fn test_blank_description_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/generate-query", r#"{"description": "   "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "ValidationError");
}

#[tokio::test]
async fn test_no_matches_is_server_error() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/generate-query",
            r#"{"description": "xyz12345 nonexistent"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to generate query: no matching fields found for description"
    );
    assert_eq!(body["error_type"], "NoMatches");
}

#[tokio::test]
async fn test_list_fields() {
    let (status, body) = send(app(), get("/api/v1/fields")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"].as_array().map(Vec::len), Some(17));

    let (_, body) = send(app(), get("/api/v1/fields?system=default")).await;
    assert_eq!(body["fields"].as_array().map(Vec::len), Some(17));

    let (_, body) = send(app(), get("/api/v1/fields?system=system_a")).await;
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 13);
    assert!(fields
        .iter()
        .all(|f| !f["system_a_field"].as_str().unwrap().is_empty()));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app().oneshot(get("/api/v2/fields")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

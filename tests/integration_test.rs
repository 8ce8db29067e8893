//! Integration tests for the API.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use construct_boundary::api::create_router;
use construct_boundary::app::{AppState, AuthConfig};
use construct_boundary::domain::{HealthResponse, HealthStatus, SchemaId};
use construct_boundary::test_utils::{
    sample_accounts, sample_for, sample_payment, sample_robot,
};

fn create_test_router() -> Router {
    create_router(Arc::new(AppState::new(AuthConfig::disabled())))
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_every_schema_endpoint_accepts_its_sample() {
    let endpoints = [
        ("/addresses", SchemaId::WalletAddress),
        ("/events", SchemaId::Event),
        ("/accounts", SchemaId::Accounts),
        ("/transactions", SchemaId::Transaction),
        ("/payments", SchemaId::Payment),
        ("/services", SchemaId::Service),
        ("/robots", SchemaId::Robot),
        ("/prices", SchemaId::Price),
        ("/software", SchemaId::Software),
    ];

    let router = create_test_router();
    for (uri, schema) in endpoints {
        let response = router
            .clone()
            .oneshot(post_json(uri, &sample_for(schema)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "endpoint {uri} rejected its sample");
    }
}

#[tokio::test]
async fn test_validated_record_echoes_required_fields() {
    let router = create_test_router();

    let response = router
        .oneshot(post_json("/payments", &sample_payment()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["invoiceId"], "inv-2024-0042");
    assert_eq!(body["amount"], "49.90");
    // omitted optional field renders as explicit null
    assert_eq!(body["status"], Value::Null);
}

#[tokio::test]
async fn test_optional_fields_render_as_null() {
    let router = create_test_router();

    let mut robot = sample_robot();
    robot.as_object_mut().unwrap().remove("price");

    let response = router.oneshot(post_json("/robots", &robot)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["price"], Value::Null);
    assert_eq!(body["image_url"], Value::Null);
    assert_eq!(body["model_id"], "R1000");
}

#[tokio::test]
async fn test_payment_missing_amount_names_the_field() {
    let router = create_test_router();

    let payload = serde_json::json!({
        "invoiceId": "i1",
        "serviceId": "s1",
        "userId": "u1"
    });

    let response = router.oneshot(post_json("/payments", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("amount"), "detail should name amount: {detail}");
}

#[tokio::test]
async fn test_empty_accounts_sequence_is_bad_request() {
    let router = create_test_router();

    let payload = serde_json::json!({ "addresses": [] });
    let response = router.oneshot(post_json("/accounts", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("at least one"), "unexpected detail: {detail}");
}

#[tokio::test]
async fn test_two_addresses_validate_in_order() {
    let router = create_test_router();

    let response = router
        .oneshot(post_json("/accounts", &sample_accounts()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let addresses = body["addresses"].as_array().unwrap();
    assert_eq!(addresses.len(), 2);
    assert_eq!(
        addresses[0],
        "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"
    );
}

#[tokio::test]
async fn test_error_body_wire_shape_is_detail_only() {
    let router = create_test_router();

    let response = router
        .oneshot(post_json("/transactions", &serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object.contains_key("detail"));
}

#[tokio::test]
async fn test_malformed_json_body_is_bad_request() {
    let router = create_test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/events")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn test_rejected_event_map_entries_are_path_qualified() {
    let router = create_test_router();

    let payload = serde_json::json!({
        "event_data": { "ok": "yes", "bad": [1, 2, 3] }
    });

    let response = router.oneshot(post_json("/events", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("event_data.bad"));
}

#[tokio::test]
async fn test_health_endpoint_reports_catalog() {
    let router = create_test_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.schemas, SchemaId::ALL.len());
}

#[tokio::test]
async fn test_metrics_endpoint_without_recorder_is_not_found() {
    let router = create_test_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Metrics are not enabled");
}

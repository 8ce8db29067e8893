//! Integration tests for authentication and the dynamic schema endpoint.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use construct_boundary::api::create_router;
use construct_boundary::app::{AppState, AuthConfig};
use construct_boundary::test_utils::{sample_payment, sample_transaction};

const SERVICE_KEY: &str = "svc-key-1f2e3d";
const ADMIN_KEY: &str = "adm-key-9a8b7c";

fn secured_router() -> Router {
    let auth = AuthConfig {
        service_key: Some(SecretString::from(SERVICE_KEY.to_string())),
        admin_key: Some(SecretString::from(ADMIN_KEY.to_string())),
    };
    create_router(Arc::new(AppState::new(auth)))
}

fn open_router() -> Router {
    create_router(Arc::new(AppState::new(AuthConfig::disabled())))
}

fn post_json(uri: &str, payload: &Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_api_key_is_unauthorized() {
    let router = secured_router();

    let response = router
        .oneshot(post_json("/payments", &sample_payment(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn test_wrong_api_key_is_unauthorized() {
    let router = secured_router();

    let response = router
        .oneshot(post_json("/payments", &sample_payment(), Some("guess")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_api_key_passes() {
    let router = secured_router();

    let response = router
        .oneshot(post_json("/payments", &sample_payment(), Some(SERVICE_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_requests_pass_without_credentials() {
    let router = secured_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_service_key_on_operator_endpoint_is_forbidden() {
    let router = secured_router();

    let response = router
        .oneshot(post_json(
            "/validate/payment",
            &sample_payment(),
            Some(SERVICE_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "The user doesn't have enough privileges");
}

#[tokio::test]
async fn test_admin_key_on_operator_endpoint_passes() {
    let router = secured_router();

    let response = router
        .oneshot(post_json(
            "/validate/payment",
            &sample_payment(),
            Some(ADMIN_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["invoiceId"], "inv-2024-0042");
}

#[tokio::test]
async fn test_missing_key_on_operator_endpoint_is_unauthorized() {
    let router = secured_router();

    let response = router
        .oneshot(post_json("/validate/payment", &sample_payment(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_schema_is_not_found() {
    let router = secured_router();

    let response = router
        .oneshot(post_json(
            "/validate/governance",
            &serde_json::json!({}),
            Some(ADMIN_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("Unknown schema: governance")
    );
}

#[tokio::test]
async fn test_operator_endpoint_validates_like_typed_routes() {
    let router = secured_router();

    let response = router
        .oneshot(post_json(
            "/validate/payment",
            &serde_json::json!({ "invoiceId": "i1" }),
            Some(ADMIN_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    for field in ["serviceId", "userId", "amount"] {
        assert!(detail.contains(field), "detail should name {field}: {detail}");
    }
}

#[tokio::test]
async fn test_open_router_accepts_unauthenticated_requests() {
    let router = open_router();

    let response = router
        .clone()
        .oneshot(post_json("/transactions", &sample_transaction(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(post_json("/validate/transaction", &sample_transaction(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

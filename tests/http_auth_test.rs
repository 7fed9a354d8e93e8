mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{issue_token, response_json, TestApp};

#[tokio::test]
async fn api_requests_without_token_are_rejected() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/brands", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn malformed_and_foreign_tokens_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/brands", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let foreign = issue_token("some-other-service-secret-with-32-chars!!");
    let response = app
        .request(Method::GET, "/api/brands", None, Some(&foreign))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutations_require_a_token_too() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/brands",
            Some(json!({ "name": "Makita" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_the_resource() {
    let app = TestApp::new().await;

    let response = app.request_authenticated(Method::GET, "/api/brands", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_open_and_reports_database_state() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

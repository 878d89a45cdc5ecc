use axum::http::StatusCode;

use crate::common::{TestClient, TestStateBuilder};

#[tokio::test]
async fn test_health() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let response = client.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let response = client.get("/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "The requested resource was not found");
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let response = client.get("/health").await;
    assert!(response.headers.contains_key("x-request-id"));
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "DENY");
    // Development by default
    assert!(!response.headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn test_hsts_in_production() {
    let state = TestStateBuilder::new()
        .with_var("ENV", "production")
        .build_lazy();
    let client = TestClient::new(state);

    let response = client.get("/health").await;
    assert!(response.headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn test_topics_for_level() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let response = client.get("/topics/b1").await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["level"], "B1");
    let topics = body["topics"].as_array().unwrap();
    assert!(topics.iter().any(|t| *t == "technology"));
}

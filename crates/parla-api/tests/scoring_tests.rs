use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{TestClient, TestStateBuilder};

async fn compare(client: &TestClient, reference: &str, attempt: &str) -> Value {
    let response = client
        .post_json(
            "/compare",
            &json!({ "reference": reference, "attempt": attempt }),
        )
        .await;
    response.assert_status(StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_compare_ignores_case_and_punctuation() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let body = compare(&client, "I am a student.", "i am a student").await;
    assert_eq!(body["ratio"], 1.0);
    assert_eq!(body["correct"], true);
    assert_eq!(body["tier"], "perfect");
    assert_eq!(body["percentage"], 100.0);
}

#[tokio::test]
async fn test_compare_near_miss_is_very_good() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let body = compare(&client, "The weather is nice today.", "Whether is nice to day").await;
    let ratio = body["ratio"].as_f64().unwrap();
    assert!((ratio - 40.0 / 47.0).abs() < 1e-9, "ratio was {ratio}");
    assert_eq!(body["tier"], "very_good");
    assert_eq!(body["correct"], true);
}

#[tokio::test]
async fn test_compare_empty_inputs() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let both = compare(&client, "", "").await;
    assert_eq!(both["ratio"], 1.0);
    assert_eq!(both["tier"], "perfect");

    let one = compare(&client, "hello", "").await;
    assert_eq!(one["ratio"], 0.0);
    assert_eq!(one["tier"], "retry");
    assert_eq!(one["correct"], false);
}

#[tokio::test]
async fn test_compare_is_symmetric() {
    let client = TestClient::new(TestStateBuilder::new().build_lazy());

    let forward = compare(&client, "she sells sea shells", "he sells shells").await;
    let backward = compare(&client, "he sells shells", "she sells sea shells").await;
    assert_eq!(forward["ratio"], backward["ratio"]);
}

#[tokio::test]
async fn test_configured_thresholds_apply() {
    let state = TestStateBuilder::new()
        .with_var("SCORING_CORRECT_THRESHOLD", "0.9")
        .build_lazy();
    let client = TestClient::new(state);

    let body = compare(&client, "The weather is nice today.", "Whether is nice to day").await;
    assert_eq!(body["tier"], "very_good");
    assert_eq!(body["correct"], false);
}

//! Prometheus metrics for monitoring API performance and learning activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use parla_core::{FeedbackTier, ProgressDelta};
use regex::Regex;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("number pattern is valid"));

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    // Configure histogram buckets for request duration (in seconds)
    let builder = builder.set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0,
        ],
    )?;

    // Install the exporter and get the handle
    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();

    // Normalize path to avoid high cardinality (replace IDs with placeholders)
    let path = normalize_path(req.uri().path());

    let in_flight = gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone());
    in_flight.increment(1.0);

    let response = next.run(req).await;

    in_flight.decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Normalize URL paths to reduce cardinality in metrics
/// Replaces UUIDs and numeric IDs with placeholders
fn normalize_path(path: &str) -> String {
    let normalized = UUID_RE.replace_all(path, ":id");
    NUMBER_RE.replace_all(&normalized, "/:id").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record one scored comparison
pub fn record_score(source: &'static str, tier: FeedbackTier) {
    counter!(
        "answers_scored_total",
        "source" => source,
        "tier" => tier.as_str()
    )
    .increment(1);
}

/// Record a call to the AI service
pub fn record_ai_call(kind: &'static str, success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!("ai_calls_total", "kind" => kind, "status" => status).increment(1);
}

/// Record an applied progress delta, one counter per field
pub fn record_progress_delta(event: &'static str, delta: &ProgressDelta) {
    counter!("progress_events_total", "event" => event).increment(1);

    let fields = [
        ("conversations", delta.conversations),
        ("vocabulary", delta.vocabulary),
        ("corrections", delta.corrections),
        ("practice", delta.practice),
        ("points", delta.points),
    ];
    for (field, value) in fields {
        if let Ok(value) = u64::try_from(value)
            && value > 0
        {
            counter!("progress_increments_total", "field" => field).increment(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/learners/550e8400-e29b-41d4-a716-446655440000"),
            "/learners/:id"
        );
        assert_eq!(
            normalize_path("/learners/550e8400-e29b-41d4-a716-446655440000/vocabulary/42"),
            "/learners/:id/vocabulary/:id"
        );
        assert_eq!(normalize_path("/topics/B1"), "/topics/B1");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: these must be no-ops rather than panics
        record_score("dictation", FeedbackTier::Good);
        record_ai_call("text", false);
        record_progress_delta("chat", &ProgressDelta::default().conversations(1).points(5));
    }
}

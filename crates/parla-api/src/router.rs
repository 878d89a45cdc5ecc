use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{chat, game, learner, listening, progress, quiz, state::ApiState, vocabulary};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .merge(learner::routes())
        .merge(chat::routes())
        .merge(progress::routes())
        .merge(vocabulary::routes())
        .merge(listening::routes())
        .merge(quiz::routes())
        .merge(game::routes())
        .fallback(handler_404)
}

/// Liveness
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the database answers a trivial query
async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}

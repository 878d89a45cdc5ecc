use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parla_core::{ExerciseError, ProgressError};
use serde_json::json;
use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("AI service error: {0}")]
    Upstream(String),
    #[error("AI service is not configured")]
    AiUnavailable,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::AiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full but reported generically
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".to_string()
            }
            ApiError::Upstream(e) => {
                tracing::warn!(error = %e, "AI service error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::InvalidArgument(msg) => ApiError::Validation(msg),
            ProgressError::NotFound(id) => ApiError::NotFound(format!("Learner {id} not found")),
            ProgressError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ExerciseError> for ApiError {
    fn from(err: ExerciseError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: invalid value"),
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages.join(", "))
    }
}

//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flashdrill_core::EngineError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

fn engine_status(error: &EngineError) -> (StatusCode, &'static str) {
    match error {
        EngineError::EmptySelection => (StatusCode::UNPROCESSABLE_ENTITY, "empty_selection"),
        EngineError::InvalidConfig(_) => (StatusCode::BAD_REQUEST, "invalid_config"),
        EngineError::ConfirmationRequired(_) | EngineError::ResetNotConfirmed => {
            (StatusCode::CONFLICT, "confirmation_required")
        }
        EngineError::UnknownFeature(_) => (StatusCode::NOT_FOUND, "not_found"),
        EngineError::FeaturesUnsupported(_) => (StatusCode::BAD_REQUEST, "unsupported"),
        EngineError::NoActiveRound => (StatusCode::NOT_FOUND, "no_active_round"),
        EngineError::RoundInProgress => (StatusCode::CONFLICT, "round_in_progress"),
        EngineError::NotCurrentCard(_) => (StatusCode::CONFLICT, "not_current_card"),
        EngineError::RoundComplete => (StatusCode::CONFLICT, "round_complete"),
        EngineError::NothingAnswered => (StatusCode::CONFLICT, "nothing_answered"),
        EngineError::CardMissing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Engine(e) => engine_status(e),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

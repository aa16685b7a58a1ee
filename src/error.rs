use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid FIT: {0}")]
    InvalidFit(String),
    #[error("No track or route points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Route has no points")]
    EmptyRoute,
    #[error("Pace multiplier must be a positive number, got {0}")]
    InvalidPaceMultiplier(f64),
}

/// Failure of a single forecast lookup. Absorbed by the weather overlay as a
/// missing sample.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Forecast request failed: {0}")]
    Request(String),
    #[error("Forecast service returned HTTP {0}")]
    Status(u16),
    #[error("Malformed forecast payload: {0}")]
    Payload(String),
    #[error("Forecast request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum FitnessError {
    #[error("Fitness platform request failed: {0}")]
    Request(String),
    #[error("Fitness platform returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid fitness platform response: {0}")]
    Payload(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Fitness(#[from] FitnessError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Parse(_) | AppError::Route(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Fitness(FitnessError::Status { status: 401, .. }) => StatusCode::UNAUTHORIZED,
            AppError::Fitness(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

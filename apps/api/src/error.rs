use auditrail_core::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

mod types;

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
///
/// Dependency failures are answered with an opaque body; their detail only
/// reaches the logs.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            error if error.is_unavailable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "internal server error".to_owned(),
            ),
            AppError::Secret(_) | AppError::Store(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_owned(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

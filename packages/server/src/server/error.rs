//! Mapping of domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::domains::listings::{FieldError, ListingError};

/// Error shape returned to API clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Forbidden(String),
    Validation(Vec<FieldError>),
    Internal(String),
}

impl From<ListingError> for ApiError {
    fn from(error: ListingError) -> Self {
        match error {
            ListingError::NotFound => ApiError::NotFound("listing not found".to_string()),
            ListingError::UnknownType(_) => ApiError::NotFound(error.to_string()),
            ListingError::InvalidPatch => ApiError::BadRequest(error.to_string()),
            ListingError::ValidationFailed(fields) => ApiError::Validation(fields),
            ListingError::Forbidden => ApiError::Forbidden(error.to_string()),
            // Should be unreachable given the timestamp fallback; alert if not
            ListingError::AllocationExhausted(_) => {
                error!(error = %error, "identifier allocation exhausted");
                ApiError::Internal(error.to_string())
            }
            ListingError::Store(store_error) => {
                error!(error = %store_error, "store operation failed");
                ApiError::Internal("internal storage error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "validation failed".to_string(),
                    details: Some(details),
                },
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

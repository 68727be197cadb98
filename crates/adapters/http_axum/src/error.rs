//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use clinic_domain::error::{AuthError, ClinicError, ConflictError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps [`ClinicError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(ClinicError),
    /// The request body or query string could not be decoded.
    BadRequest(String),
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        let err = match self {
            Self::Domain(err) => err,
            Self::BadRequest(message) => {
                return (StatusCode::BAD_REQUEST, "invalid_request", message.clone());
            }
        };
        match err {
            ClinicError::Auth(AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string())
            }
            ClinicError::Auth(AuthError::Unauthorized) => {
                (StatusCode::FORBIDDEN, "unauthorized", err.to_string())
            }
            ClinicError::Auth(AuthError::Forbidden) => {
                (StatusCode::FORBIDDEN, "forbidden", err.to_string())
            }
            ClinicError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
            }
            ClinicError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
            ClinicError::Conflict(ConflictError::SlotTaken { .. }) => {
                (StatusCode::CONFLICT, "slot_taken", err.to_string())
            }
            ClinicError::Conflict(ConflictError::AlreadyPaid { .. }) => {
                (StatusCode::CONFLICT, "already_paid", err.to_string())
            }
            ClinicError::PaymentProcessing(source) => {
                tracing::error!(error = %source, "payment processor error");
                (
                    StatusCode::BAD_GATEWAY,
                    "payment_processing_failed",
                    "payment processing failed".to_string(),
                )
            }
            ClinicError::Storage(source) | ClinicError::Credential(source) => {
                tracing::error!(error = %source, kind = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

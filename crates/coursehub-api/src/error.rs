//! CourseHub API — error types.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coursehub_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Tracing or exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by the application layer.
    Domain(DomainError),
    /// The request body or path could not be extracted.
    Rejected {
        /// Status chosen by the extractor (400, 415 or 422).
        status: StatusCode,
        /// The extractor's explanation.
        message: String,
    },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Domain(err) => {
                let (status, error_code) = match &err {
                    DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::Infrastructure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                    }
                };
                (status, error_code, err.to_string())
            }
            Self::Rejected { status, message } => (status, "validation_error", message),
        };

        let body = ErrorBody {
            success: false,
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

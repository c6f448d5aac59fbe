//! Unified error types for the vehicle diagnostics service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Unified error type for the service process.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration values failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record-access errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No vehicle with the given id exists.
    #[error("Vehicle {id} not found")]
    NotFound {
        /// The requested id.
        id: i64,
    },

    /// SQLite returned an error.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection lock.
    #[error("storage lock poisoned")]
    LockPoisoned,

    /// The backing store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Request body validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Body absent, `null`, or an empty object.
    #[error("No input data provided")]
    NoInput,

    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A text field is empty or whitespace.
    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),

    /// Body is not valid JSON, or a field has the wrong type.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// Body is valid JSON but not an object.
    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or incomplete request (400).
    #[error("{0}")]
    BadRequest(String),

    /// Addressed record does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Any other failure, message passed through verbatim (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected ({}): {}", status, self);
        }

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for record-access operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

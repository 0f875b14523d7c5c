use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use signage_core::error::CoreError;
use signage_core::pdf::PdfError;
use signage_store::StoreError;

/// Hint returned when the server cannot write its own data files.
const PERMISSION_HINT: &str =
    "Permission denied writing server data. Fix ownership of the data directory, e.g. `sudo chown pi:pi backend/config.json`.";

/// Message returned when a PDF preview could not be produced.
const CONVERSION_HINT: &str = "PDF conversion failed. Make sure poppler-utils is installed.";

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, storage and conversion errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `signage_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `signage_store`.
    #[error(transparent)]
    Store(StoreError),

    /// The PDF preview could not be rendered.
    #[error("PDF conversion failed: {0}")]
    Pdf(#[from] PdfError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    /// Domain errors surfaced by the stores keep their own status codes.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => AppError::Core(core),
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Storage errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Conversion errors ---
            AppError::Pdf(err) => {
                tracing::error!(error = %err, "PDF conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONVERSION_FAILED",
                    CONVERSION_HINT.to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - Permission problems map to 500 with an ownership hint for the operator.
/// - I/O failures map to 500 and name the failing operation without the path.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Core(core) => classify_core_error(core),
        StoreError::PermissionDenied { path } => {
            tracing::error!(%path, "Permission denied on server data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERMISSION_DENIED",
                PERMISSION_HINT.to_string(),
            )
        }
        StoreError::Io { path, source } => {
            tracing::error!(%path, error = %source, "Storage I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                format!("Failed to access server storage: {source}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Storage error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use razzie_db::loader::IngestError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`IngestError`] for CSV ingest failures and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A fatal CSV ingest failure.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource or result does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Ingest failures ---
            // A malformed or missing upload is the client's problem.
            // Failures reading the staged copy or talking to storage
            // happen on server-owned resources and are ours.
            AppError::Ingest(ingest) => match ingest {
                IngestError::SchemaMismatch { .. }
                | IngestError::SourceNotFound(_)
                | IngestError::Csv(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_CSV", ingest.to_string())
                }
                IngestError::Read(err) => {
                    tracing::error!(error = %err, "I/O failure reading staged source");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                IngestError::Storage(err) | IngestError::Commit(err) => {
                    tracing::error!(error = %err, "Storage failure during ingest");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_source_maps_to_400() {
        let err = AppError::Ingest(IngestError::SchemaMismatch {
            missing: vec!["producers".to_string()],
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn staged_file_read_failure_maps_to_500() {
        let err = AppError::Ingest(IngestError::Read(std::io::Error::other("disk gone")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let err = AppError::Ingest(IngestError::Storage(sqlx::Error::PoolClosed));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

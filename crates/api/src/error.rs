use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sideline_core::error::{ErrorClass, SeasonError};
use sideline_engine::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`EngineError`] for engine operations and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the uniform
/// `{ "error": message, "code": CODE }` JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An engine error (domain or database).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Engine(EngineError::Domain(err)) => classify_domain_error(err),
            AppError::Engine(EngineError::Database(err)) | AppError::Database(err) => {
                classify_sqlx_error(err)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error onto an HTTP status by its class: validation errors
/// are the caller's input (400), state errors resolve by re-reading and
/// retrying (409), not-found is 404.
fn classify_domain_error(err: &SeasonError) -> (StatusCode, &'static str, String) {
    let status = match err.class() {
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::State => StatusCode::CONFLICT,
        ErrorClass::Validation => StatusCode::BAD_REQUEST,
    };
    (status, err.code(), err.to_string())
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409 — the duplicate-registration race resolves here.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

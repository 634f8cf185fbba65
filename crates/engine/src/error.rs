//! Engine error type: domain failures plus repository failures.

use sideline_core::error::SeasonError;

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `sideline-core`.
    #[error(transparent)]
    Domain(#[from] SeasonError),

    /// A database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for engine operation results.
pub type EngineResult<T> = Result<T, EngineError>;

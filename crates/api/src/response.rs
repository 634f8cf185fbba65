//! Shared response envelope for API handlers.
//!
//! Successful responses wrap their payload in `{ "data": ... }`; error
//! responses carry `{ "error", "code" }` (see [`crate::error::AppError`]).
//! Together these form the service's uniform result shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

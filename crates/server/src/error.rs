//! Error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Protocol-level request failures, split into the three response
/// classes clients can distinguish.
#[derive(Debug, thiserror::Error)]
pub enum BitsError {
    /// Malformed or absent required header, wrong method, bad range,
    /// unrecognized packet type.
    #[error("{0}")]
    BadRequest(String),

    /// Unresolvable or invalid session identifier.
    #[error("{0}")]
    NotFound(String),

    /// Filesystem or task failure while handling the request.
    #[error("{0}")]
    Internal(String),
}

impl BitsError {
    fn status(&self) -> StatusCode {
        match self {
            BitsError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BitsError::NotFound(_) => StatusCode::NOT_FOUND,
            BitsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BitsError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, "request failed: {self}");
        // Short plain-text body prefixed with the status code, e.g.
        // `404 BITS-Session-Id not found`.
        (status, format!("{} {}", status.as_u16(), self)).into_response()
    }
}

impl From<tokio::task::JoinError> for BitsError {
    fn from(e: tokio::task::JoinError) -> Self {
        BitsError::Internal(format!("blocking task failed: {e}"))
    }
}

impl From<axum::http::header::InvalidHeaderValue> for BitsError {
    fn from(e: axum::http::header::InvalidHeaderValue) -> Self {
        BitsError::Internal(format!("invalid response header: {e}"))
    }
}

//! Per-request error type
//!
//! Every failure a handler can hit maps to a status code here. None of them
//! escape the request: the listener and other transfers keep running.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::streaming::UploadError;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// No shared file has the requested display name
    #[error("No shared file named {name:?}")]
    NotFound {
        /// Decoded name from the request path
        name: String,
    },

    /// Range start lies at or beyond the end of the file
    #[error("Range not satisfiable for a {size} byte file")]
    RangeNotSatisfiable {
        /// File length used in `Content-Range: bytes */{size}`
        size: u64,
    },

    /// Upload could not be persisted
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    /// Opening or seeking the file to serve failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response headers could not be assembled
    #[error("Failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            WebError::RangeNotSatisfiable { size } => {
                warn!(size, "Rejecting unsatisfiable range");
                let content_range = HeaderValue::from_str(&format!("bytes */{size}"))
                    .unwrap_or_else(|_| HeaderValue::from_static("bytes */0"));
                (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, content_range)],
                    "Range Not Satisfiable",
                )
                    .into_response()
            }
            WebError::Upload(UploadError::InvalidName { name }) => {
                warn!(name = %name, "Rejecting upload with unusable name");
                (StatusCode::BAD_REQUEST, "Invalid file name").into_response()
            }
            WebError::Upload(e) => {
                error!(error = %e, "Upload aborted");
                (StatusCode::INTERNAL_SERVER_ERROR, "Upload failed").into_response()
            }
            WebError::Io(e) => {
                error!(error = %e, "File I/O failed before streaming");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            WebError::Response(e) => {
                error!(error = %e, "Response construction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

//! Upload handler

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use streamshare_core::FileDescriptor;
use tracing::info;

use crate::error::WebError;
use crate::server::AppState;
use crate::streaming::upload::timestamp_file_name;

/// Query parameters of `POST /upload`.
///
/// A repeated `name` keeps its first value.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct UploadQuery {
    /// Client file name; a timestamped name is used when absent
    pub name: Option<String>,
}

impl From<Vec<(String, String)>> for UploadQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self {
            name: pairs
                .into_iter()
                .find(|(key, _)| key == "name")
                .map(|(_, value)| value),
        }
    }
}

/// `POST /upload?name=`: stores the raw request body and shares it.
///
/// # Errors
/// - `WebError::Upload` - The body could not be received or written
/// - `WebError::Io` - The stored file could not be inspected afterwards
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Body,
) -> Result<(StatusCode, &'static str), WebError> {
    let name = query
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(timestamp_file_name);

    let stored = state
        .uploads
        .receive(&name, body.into_data_stream())
        .await?;
    let path = tokio::fs::canonicalize(&stored).await?;
    let size = tokio::fs::metadata(&path).await?.len();

    let descriptor = state
        .registry
        .register_upload(FileDescriptor::new(path, size));
    info!(
        file = %descriptor.display_name,
        size,
        "Upload shared"
    );

    Ok((StatusCode::OK, "Success"))
}

//! Download handler and transfer mode selection

use std::net::SocketAddr;

use axum::extract::rejection::PathRejection;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use streamshare_core::FileDescriptor;
use tracing::debug;

use super::range::{ByteRange, RangeOutcome, parse_range_header};
use crate::error::WebError;
use crate::server::AppState;
use crate::templates;

/// Query flags accepted on a download path.
///
/// Only the literal value `true` switches a flag on. A repeated key keeps its
/// first value; unknown keys are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct TransferFlags {
    /// `raw=true` streams a video instead of wrapping it in a player page
    pub raw: Option<String>,
    /// `download=true` forces a full attachment download
    pub download: Option<String>,
}

impl From<Vec<(String, String)>> for TransferFlags {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };
        Self {
            raw: first("raw"),
            download: first("download"),
        }
    }
}

impl TransferFlags {
    /// Whether `raw=true` was given.
    pub fn is_raw(&self) -> bool {
        self.raw.as_deref() == Some("true")
    }

    /// Whether `download=true` was given.
    pub fn is_download(&self) -> bool {
        self.download.as_deref() == Some("true")
    }
}

/// How a download request will be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// HTML page embedding a player for the raw stream
    Watch,
    /// `206` with the given span
    Partial(ByteRange),
    /// `416`, the range starts past the end of the file
    Unsatisfiable,
    /// `200` with the whole file
    Full,
}

impl TransferMode {
    /// Picks the response mode for a request.
    ///
    /// Videos open in the player unless `raw` or `download` is set. A `Range`
    /// header is honored unless `download` is set; one this server cannot
    /// parse falls back to a full download.
    pub fn decide(
        descriptor: &FileDescriptor,
        flags: &TransferFlags,
        range_header: Option<&str>,
    ) -> Self {
        if descriptor.is_video() && !flags.is_raw() && !flags.is_download() {
            return TransferMode::Watch;
        }

        match range_header {
            Some(value) if !flags.is_download() => {
                match parse_range_header(value, descriptor.size_bytes) {
                    RangeOutcome::Satisfiable(range) => TransferMode::Partial(range),
                    RangeOutcome::Unsatisfiable => TransferMode::Unsatisfiable,
                    RangeOutcome::Ignored => TransferMode::Full,
                }
            }
            _ => TransferMode::Full,
        }
    }
}

/// `GET /{name}`: serves a shared file by display name.
///
/// A name that does not decode to UTF-8 cannot be registered, so it is
/// answered like any other unknown name.
///
/// # Errors
/// - `WebError::NotFound` - No shared file has that name
/// - `WebError::RangeNotSatisfiable` - The range starts past the end of the file
/// - `WebError::Io` - The file could not be opened
pub async fn download_file(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
    Query(flags): Query<TransferFlags>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let name = match name {
        Ok(Path(name)) => name,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Undecodable file name");
            return Err(WebError::NotFound {
                name: rejection.body_text(),
            });
        }
    };
    serve_named(&state, &name, &flags, peer, &headers).await
}

/// `GET /upload`: a shared file may itself be called `upload`.
///
/// # Errors
/// Same as [`download_file`].
pub async fn download_named_upload(
    State(state): State<AppState>,
    Query(flags): Query<TransferFlags>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    serve_named(&state, "upload", &flags, peer, &headers).await
}

async fn serve_named(
    state: &AppState,
    name: &str,
    flags: &TransferFlags,
    peer: SocketAddr,
    headers: &HeaderMap,
) -> Result<Response, WebError> {
    let descriptor = state
        .registry
        .lookup(name)
        .ok_or_else(|| WebError::NotFound {
            name: name.to_string(),
        })?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let mode = TransferMode::decide(&descriptor, flags, range_header);
    debug!(file = %descriptor.display_name, ?mode, peer = %peer, "Download requested");

    match mode {
        TransferMode::Watch => Ok(Html(templates::watch_page(&descriptor)).into_response()),
        TransferMode::Partial(range) => state.engine.serve_partial(descriptor, range).await,
        TransferMode::Unsatisfiable => Err(WebError::RangeNotSatisfiable {
            size: descriptor.size_bytes,
        }),
        TransferMode::Full => state.engine.serve_full(descriptor, Some(peer)).await,
    }
}

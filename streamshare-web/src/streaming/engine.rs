//! Full and partial file responses
//!
//! Headers are computed from the descriptor; the body is a
//! [`ProgressStream`] over the file opened at the right offset. Once the
//! headers are out, a read failure can only end the body early, which hyper
//! turns into a closed connection.

use std::io::SeekFrom;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use streamshare_core::FileDescriptor;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tracing::{debug, info};

use super::observer::TransferObserver;
use super::progress_stream::ProgressStream;
use super::session::TransferSession;
use crate::error::WebError;
use crate::handlers::range::ByteRange;

/// Serves file bodies in fixed-size chunks.
#[derive(Clone)]
pub struct StreamingEngine {
    chunk_size: usize,
    observer: Arc<dyn TransferObserver>,
}

impl StreamingEngine {
    /// Creates an engine reading `chunk_size` bytes per body chunk and
    /// reporting full downloads to `observer`.
    pub fn new(chunk_size: usize, observer: Arc<dyn TransferObserver>) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            observer,
        }
    }

    /// `200 OK` attachment download of the whole file, with progress
    /// reporting.
    ///
    /// # Errors
    /// - `WebError::Io` - The file could not be opened
    /// - `WebError::Response` - Headers could not be assembled
    pub async fn serve_full(
        &self,
        descriptor: Arc<FileDescriptor>,
        peer: Option<SocketAddr>,
    ) -> Result<Response, WebError> {
        let size = descriptor.size_bytes;
        let reader = open_span(&descriptor, 0, size).await?;

        info!(
            file = %descriptor.display_name,
            size,
            peer = ?peer,
            "Starting download"
        );

        let disposition = content_disposition(&descriptor.display_name);
        let content_type = descriptor.content_type.clone();
        let stream = ProgressStream::new(
            reader,
            self.chunk_size,
            TransferSession::full(descriptor),
            Some(Arc::clone(&self.observer)),
            peer,
        );

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, size)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_DISPOSITION, disposition)
            .body(Body::from_stream(stream))?;
        Ok(response)
    }

    /// `206 Partial Content` response for `range`, without progress
    /// reporting.
    ///
    /// # Errors
    /// - `WebError::Io` - The file could not be opened or seeked
    /// - `WebError::Response` - Headers could not be assembled
    pub async fn serve_partial(
        &self,
        descriptor: Arc<FileDescriptor>,
        range: ByteRange,
    ) -> Result<Response, WebError> {
        let size = descriptor.size_bytes;
        let length = range.length();
        let reader = open_span(&descriptor, range.start, length).await?;

        debug!(
            file = %descriptor.display_name,
            start = range.start,
            end = range.end,
            length,
            "Serving range"
        );

        let content_type = descriptor.content_type.clone();
        let stream = ProgressStream::new(
            reader,
            self.chunk_size,
            TransferSession::partial(descriptor, range.start, range.end),
            None,
            None,
        );

        let response = Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_RANGE, range.content_range(size))
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_LENGTH, length)
            .body(Body::from_stream(stream))?;
        Ok(response)
    }
}

/// Opens the file positioned at `start`, limited to `length` bytes.
async fn open_span(
    descriptor: &FileDescriptor,
    start: u64,
    length: u64,
) -> std::io::Result<Take<File>> {
    let mut file = File::open(&descriptor.absolute_path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(file.take(length))
}

/// `attachment; filename="..."` with an RFC 5987 `filename*` for names that
/// are not plain ASCII.
fn content_disposition(name: &str) -> String {
    let ascii_safe = name
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if ascii_safe {
        return format!("attachment; filename=\"{name}\"");
    }

    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(name)
    )
}

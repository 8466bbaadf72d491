//! Inbound upload persistence
//!
//! Request bodies are written chunk by chunk to a hidden temporary file next
//! to the destination and renamed into place once the body ends, so a
//! half-received upload is never visible under its final name.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Buf;
use futures::{Stream, StreamExt};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Errors from receiving an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The name has no usable final path component
    #[error("Unusable upload name: {name:?}")]
    InvalidName {
        /// Name as sent by the client
        name: String,
    },

    /// The client's body stream failed
    #[error("Reading the request body failed: {reason}")]
    Body {
        /// Error reported by the body stream
        reason: String,
    },

    /// The client stopped sending data
    #[error("No upload data received for {0:?}")]
    IdleTimeout(Duration),

    /// Disk write, flush or rename failed
    #[error("Writing upload to disk failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded bodies into one directory.
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    directory: PathBuf,
    temp_suffix: String,
    idle_timeout: Duration,
}

impl UploadReceiver {
    /// Creates a receiver storing files in `directory`.
    pub fn new(directory: PathBuf, temp_suffix: &str, idle_timeout: Duration) -> Self {
        Self {
            directory,
            temp_suffix: temp_suffix.to_string(),
            idle_timeout,
        }
    }

    /// Streams `body` to `{directory}/{name}` and returns the final path.
    ///
    /// An existing file with the same name is overwritten. On any failure the
    /// temporary file is removed and the destination is left untouched.
    ///
    /// # Errors
    /// - `UploadError::InvalidName` - `name` has no usable file name component
    /// - `UploadError::Body` - The client's body stream failed
    /// - `UploadError::IdleTimeout` - No chunk arrived within the idle timeout
    /// - `UploadError::Io` - Creating, writing or renaming the file failed
    pub async fn receive<S, B, E>(&self, name: &str, body: S) -> Result<PathBuf, UploadError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: Buf,
        E: std::fmt::Display,
    {
        let file_name = sanitize_file_name(name)?;
        let destination = self.directory.join(&file_name);
        let temp_path = self.directory.join(format!(
            ".{file_name}.{}{}",
            unique_suffix(),
            self.temp_suffix
        ));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .await?;

        match self.write_body(file, body).await {
            Ok(bytes) => {
                if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
                    warn!(file = %file_name, "Upload overwrites an existing file");
                }
                if let Err(e) = tokio::fs::rename(&temp_path, &destination).await {
                    discard(&temp_path).await;
                    return Err(e.into());
                }
                info!(file = %file_name, bytes, "Upload complete");
                Ok(destination)
            }
            Err(e) => {
                discard(&temp_path).await;
                Err(e)
            }
        }
    }

    async fn write_body<S, B, E>(&self, mut file: File, mut body: S) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: Buf,
        E: std::fmt::Display,
    {
        let mut written = 0u64;

        loop {
            let next = tokio::time::timeout(self.idle_timeout, body.next())
                .await
                .map_err(|_| UploadError::IdleTimeout(self.idle_timeout))?;

            match next {
                Some(Ok(mut chunk)) => {
                    written += chunk.remaining() as u64;
                    file.write_all_buf(&mut chunk).await?;
                }
                Some(Err(e)) => {
                    return Err(UploadError::Body {
                        reason: e.to_string(),
                    });
                }
                None => break,
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

/// Keeps only the final path component of a client-supplied name.
fn sanitize_file_name(name: &str) -> Result<String, UploadError> {
    let invalid = || UploadError::InvalidName {
        name: name.to_string(),
    };

    // Clients on other platforms may send backslash-separated paths.
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return Err(invalid());
    }
    Ok(last.to_string())
}

fn unique_suffix() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    format!("{nanos:x}")
}

async fn discard(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        debug!(path = %temp_path.display(), error = %e, "Could not remove partial upload");
    }
}

/// Name for an upload that arrived without one.
pub fn timestamp_file_name() -> String {
    format!("upload-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"))
}

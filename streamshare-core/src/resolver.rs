//! Resolution of operator-supplied paths to shareable files
//!
//! Accepts paths with or without their extension: `talk` finds `talk.mp4`
//! in the same directory when no file is literally named `talk`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::registry::FileDescriptor;

/// Errors from path resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves `input` to a descriptor for an existing regular file.
///
/// A verbatim match wins. Otherwise the parent directory is listed in name
/// order and the first regular file whose stem equals the input's file name
/// is used.
///
/// # Errors
/// - `ResolveError::NotFound` - Neither the path nor an extension match exists
/// - `ResolveError::NotAFile` - The path names a directory or special file
/// - `ResolveError::Io` - Metadata or directory listing failed
pub async fn resolve(input: &Path) -> Result<FileDescriptor, ResolveError> {
    let path = match tokio::fs::metadata(input).await {
        Ok(metadata) if metadata.is_file() => input.to_path_buf(),
        Ok(_) => {
            return Err(ResolveError::NotAFile {
                path: input.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let matched = find_by_stem(input).await?;
            debug!(input = %input.display(), matched = %matched.display(), "Resolved path by stem");
            matched
        }
        Err(source) => {
            return Err(ResolveError::Io {
                path: input.to_path_buf(),
                source,
            });
        }
    };

    let absolute_path = tokio::fs::canonicalize(&path)
        .await
        .map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
    let metadata = tokio::fs::metadata(&absolute_path)
        .await
        .map_err(|source| ResolveError::Io {
            path: absolute_path.clone(),
            source,
        })?;

    Ok(FileDescriptor::new(absolute_path, metadata.len()))
}

/// Looks for `<parent>/<name>.<any extension>`.
async fn find_by_stem(input: &Path) -> Result<PathBuf, ResolveError> {
    let not_found = || ResolveError::NotFound {
        path: input.to_path_buf(),
    };

    let wanted = input.file_name().ok_or_else(not_found)?;
    let parent = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut entries = match tokio::fs::read_dir(&parent).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => return Err(ResolveError::Io { path: parent, source }),
    };

    let mut candidates = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => return Err(ResolveError::Io { path: parent, source }),
        };

        let path = entry.path();
        if path.file_stem() != Some(wanted) {
            continue;
        }
        if entry.file_type().await.is_ok_and(|kind| kind.is_file()) {
            candidates.push(path);
        }
    }

    candidates.sort();
    candidates.into_iter().next().ok_or_else(not_found)
}

//! In-memory registry of shared files
//!
//! Built once at startup from the resolved CLI paths and appended to by
//! completed uploads. Descriptors are immutable and shared as `Arc`s, so a
//! request that looked one up keeps a consistent view even if an upload
//! lands mid-transfer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::mime;

/// A file the server can hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Canonical location on disk
    pub absolute_path: PathBuf,
    /// Name used in URLs and on the landing page, unique within the registry
    pub display_name: String,
    /// File length at the time the descriptor was created
    pub size_bytes: u64,
    /// MIME type served in `Content-Type`
    pub content_type: String,
}

impl FileDescriptor {
    /// Creates a descriptor named after the file's final path component.
    pub fn new(absolute_path: PathBuf, size_bytes: u64) -> Self {
        let display_name = absolute_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| absolute_path.to_string_lossy().into_owned());
        let content_type = mime::content_type_for(&absolute_path);

        Self {
            absolute_path,
            display_name,
            size_bytes,
            content_type,
        }
    }

    /// Returns the same file under another display name.
    pub fn with_display_name(self, display_name: String) -> Self {
        Self {
            display_name,
            ..self
        }
    }

    /// Whether the landing page should offer in-browser playback.
    pub fn is_video(&self) -> bool {
        mime::is_video(&self.content_type)
    }
}

/// Ordered, append-only list of shared files.
///
/// Readers take a short read lock to clone out an `Arc`; writers build the
/// descriptor first and only hold the write lock for the push.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    entries: RwLock<Vec<Arc<FileDescriptor>>>,
}

impl ContentRegistry {
    /// Creates the startup registry.
    ///
    /// Descriptors keep their order. When two files share a display name the
    /// later one is renamed `stem (2).ext`, `stem (3).ext` and so on, so every
    /// file stays reachable by name.
    pub fn new(descriptors: Vec<FileDescriptor>) -> Self {
        let mut entries: Vec<Arc<FileDescriptor>> = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let name = unique_display_name(&descriptor.display_name, &entries);
            if name != descriptor.display_name {
                warn!(
                    original = %descriptor.display_name,
                    renamed = %name,
                    path = %descriptor.absolute_path.display(),
                    "Duplicate file name, serving under a numbered name"
                );
            }
            entries.push(Arc::new(descriptor.with_display_name(name)));
        }

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Finds a file by its display name.
    pub fn lookup(&self, name: &str) -> Option<Arc<FileDescriptor>> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.display_name == name)
            .cloned()
    }

    /// Ordered copy of the current entries.
    pub fn snapshot(&self) -> Vec<Arc<FileDescriptor>> {
        self.entries.read().clone()
    }

    /// Records a completed upload.
    ///
    /// An upload that overwrote a file already in the registry replaces that
    /// entry in place and keeps its name; anything else is appended.
    pub fn register_upload(&self, descriptor: FileDescriptor) -> Arc<FileDescriptor> {
        let mut entries = self.entries.write();

        if let Some(slot) = entries
            .iter_mut()
            .find(|entry| entry.absolute_path == descriptor.absolute_path)
        {
            let replacement = Arc::new(descriptor.with_display_name(slot.display_name.clone()));
            *slot = Arc::clone(&replacement);
            return replacement;
        }

        let name = unique_display_name(&descriptor.display_name, &entries);
        let descriptor = Arc::new(descriptor.with_display_name(name));
        entries.push(Arc::clone(&descriptor));
        descriptor
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Picks `name`, or the first free `stem (n).ext` with n starting at 2.
fn unique_display_name(name: &str, entries: &[Arc<FileDescriptor>]) -> String {
    let taken = |candidate: &str| entries.iter().any(|entry| entry.display_name == candidate);
    if !taken(name) {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (2u32..)
        .map(|n| format!("{stem} ({n}){extension}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

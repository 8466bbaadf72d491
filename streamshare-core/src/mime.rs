//! Content-type resolution from file extensions

use std::path::Path;

/// Fallback for unknown or missing extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Determines the content type served for `path`.
///
/// Extension matching is case-insensitive; anything unknown is served as
/// [`DEFAULT_CONTENT_TYPE`].
///
/// # Examples
/// ```
/// use streamshare_core::mime::content_type_for;
///
/// assert_eq!(content_type_for("Holiday.MP4".as_ref()), "video/mp4");
/// assert_eq!(content_type_for("notes".as_ref()), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> String {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return DEFAULT_CONTENT_TYPE.to_string();
    };

    mime_guess::from_ext(&extension.to_ascii_lowercase())
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Whether browsers should get the watch page instead of raw bytes.
pub fn is_video(content_type: &str) -> bool {
    content_type.starts_with("video/")
}

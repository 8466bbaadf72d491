//! HTTP request handlers organized by functionality

pub mod download;
pub mod pages;
pub mod range;
pub mod upload;

use axum::http::StatusCode;

pub use download::{TransferFlags, TransferMode, download_file, download_named_upload};
pub use pages::landing_page;
pub use range::{ByteRange, RangeOutcome, parse_range_header};
pub use upload::{UploadQuery, upload_file};

/// Answer for unknown paths and unsupported methods.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

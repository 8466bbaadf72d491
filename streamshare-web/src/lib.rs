//! StreamShare Web - HTTP surface of the file transfer server
//!
//! Routes requests to the landing page, the streaming engine or the upload
//! receiver. Full downloads report progress through a pluggable
//! [`TransferObserver`]; range requests stream silently.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod error;
pub mod handlers;
pub mod server;
pub mod streaming;
pub mod templates;

// Re-export main types
pub use error::WebError;
pub use server::{AppState, build_router, run_server, run_server_with_shutdown};
pub use streaming::{
    ConsoleProgress, SilentObserver, StreamingEngine, TransferObserver, TransferSession,
    UploadReceiver,
};

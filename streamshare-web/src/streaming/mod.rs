//! Streaming engine and upload receiver
//!
//! Files move chunk by chunk in both directions so that memory per
//! transfer stays bounded by one buffer, however large the file or slow the
//! peer.

pub mod engine;
pub mod observer;
pub mod progress_stream;
pub mod session;
pub mod upload;

pub use engine::StreamingEngine;
pub use observer::{ConsoleProgress, SilentObserver, TransferObserver};
pub use progress_stream::ProgressStream;
pub use session::TransferSession;
pub use upload::{UploadError, UploadReceiver};

//! Transfer progress reporting
//!
//! The streaming engine only calls into [`TransferObserver`]; whether that
//! ends up as a console progress bar, nothing at all, or a test recorder is
//! decided by whoever builds the [`AppState`](crate::AppState).

use std::io::Write;
use std::net::SocketAddr;

use tracing::{info, warn};

use super::session::TransferSession;

/// Receives progress events from full downloads.
///
/// Called from the body stream's poll path, so implementations must be
/// cheap and must not block on anything but a console write.
pub trait TransferObserver: Send + Sync {
    /// A chunk was handed to the socket; `session.bytes_sent` is updated.
    fn on_progress(&self, session: &TransferSession);

    /// Every byte of the response was sent.
    fn on_complete(&self, session: &TransferSession, peer: Option<SocketAddr>);

    /// The transfer ended early: client disconnect or read failure.
    fn on_abort(&self, session: &TransferSession, reason: &str) {
        let _ = (session, reason);
    }
}

/// Overwriting console progress line plus a completion log line.
///
/// Concurrent downloads share the one console line and will clobber each
/// other's percentages; served bytes are unaffected.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl TransferObserver for ConsoleProgress {
    fn on_progress(&self, session: &TransferSession) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "Progress: {:.2}%\r", session.percent_complete());
        let _ = stdout.flush();
    }

    fn on_complete(&self, session: &TransferSession, peer: Option<SocketAddr>) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let peer = peer.map_or_else(|| "unknown peer".to_string(), |addr| addr.ip().to_string());

        println!();
        println!("Download complete: {}", session.descriptor.display_name);
        println!("[{timestamp}] Served to {peer}");

        info!(
            file = %session.descriptor.display_name,
            bytes = session.bytes_sent,
            peer = %peer,
            "Download complete"
        );
    }

    fn on_abort(&self, session: &TransferSession, reason: &str) {
        println!();
        warn!(
            file = %session.descriptor.display_name,
            sent = session.bytes_sent,
            expected = session.length(),
            reason,
            "Download aborted"
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl TransferObserver for SilentObserver {
    fn on_progress(&self, _session: &TransferSession) {}

    fn on_complete(&self, session: &TransferSession, _peer: Option<SocketAddr>) {
        info!(
            file = %session.descriptor.display_name,
            bytes = session.bytes_sent,
            "Download complete"
        );
    }
}

//! Per-request transfer bookkeeping

use std::sync::Arc;

use streamshare_core::FileDescriptor;

/// State of one streaming response.
///
/// Lives inside the response body stream: created when streaming starts,
/// dropped when the body completes or the connection goes away.
#[derive(Debug, Clone)]
pub struct TransferSession {
    /// File being served
    pub descriptor: Arc<FileDescriptor>,
    /// First byte offset served
    pub range_start: u64,
    /// Last byte offset served, inclusive (0 for an empty file)
    pub range_end: u64,
    /// Bytes handed to the socket so far
    pub bytes_sent: u64,
    length: u64,
}

impl TransferSession {
    /// Session covering the whole file.
    pub fn full(descriptor: Arc<FileDescriptor>) -> Self {
        let size = descriptor.size_bytes;
        Self {
            descriptor,
            range_start: 0,
            range_end: size.saturating_sub(1),
            bytes_sent: 0,
            length: size,
        }
    }

    /// Session covering `start..=end`.
    pub fn partial(descriptor: Arc<FileDescriptor>, start: u64, end: u64) -> Self {
        Self {
            descriptor,
            range_start: start,
            range_end: end,
            bytes_sent: 0,
            length: end - start + 1,
        }
    }

    /// Number of bytes this response promises in `Content-Length`.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Share of the promised bytes already sent, 0.0 to 100.0.
    pub fn percent_complete(&self) -> f64 {
        if self.length == 0 {
            return 100.0;
        }
        self.bytes_sent as f64 / self.length as f64 * 100.0
    }

    /// Whether every promised byte has been sent.
    pub fn is_complete(&self) -> bool {
        self.bytes_sent >= self.length
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn file(size: u64) -> Arc<FileDescriptor> {
        Arc::new(FileDescriptor::new(PathBuf::from("/srv/file.bin"), size))
    }

    #[test]
    fn test_full_session_bounds() {
        let session = TransferSession::full(file(10));
        assert_eq!((session.range_start, session.range_end), (0, 9));
        assert_eq!(session.length(), 10);
    }

    #[test]
    fn test_empty_file_is_complete_immediately() {
        let session = TransferSession::full(file(0));
        assert_eq!(session.length(), 0);
        assert!(session.is_complete());
        assert_eq!(session.percent_complete(), 100.0);
    }

    #[test]
    fn test_percent_complete() {
        let mut session = TransferSession::partial(file(1000), 100, 299);
        assert_eq!(session.length(), 200);

        session.bytes_sent = 50;
        assert_eq!(session.percent_complete(), 25.0);
        assert!(!session.is_complete());

        session.bytes_sent = 200;
        assert!(session.is_complete());
    }
}

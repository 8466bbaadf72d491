//! Response body stream with transfer accounting
//!
//! Wraps the chunked file reader so every chunk updates the session and,
//! for full downloads, notifies the observer. Dropping the stream after it
//! started but before the last chunk (client went away) closes the file and
//! reports the abort. A body that is never polled, as for `HEAD`, reports
//! nothing.

use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio::io::Take;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

use super::observer::TransferObserver;
use super::session::TransferSession;

/// Chunked file body that tracks how much of it reached the socket.
pub struct ProgressStream {
    inner: ReaderStream<Take<File>>,
    session: TransferSession,
    observer: Option<Arc<dyn TransferObserver>>,
    peer: Option<SocketAddr>,
    polled: bool,
    finished: bool,
}

impl ProgressStream {
    /// Creates a stream over `reader`, which must already be positioned at
    /// `session.range_start` and limited to `session.length()` bytes.
    ///
    /// Passing no observer streams silently; range responses do this.
    pub fn new(
        reader: Take<File>,
        chunk_size: usize,
        session: TransferSession,
        observer: Option<Arc<dyn TransferObserver>>,
        peer: Option<SocketAddr>,
    ) -> Self {
        Self {
            inner: ReaderStream::with_capacity(reader, chunk_size),
            session,
            observer,
            peer,
            polled: false,
            finished: false,
        }
    }

    fn record_chunk(&mut self, chunk: &Bytes) {
        self.session.bytes_sent += chunk.len() as u64;
        if let Some(observer) = &self.observer {
            observer.on_progress(&self.session);
        }
    }

    fn finish(&mut self) -> Option<std::io::Error> {
        self.finished = true;

        if !self.session.is_complete() {
            let reason = format!(
                "file ended after {} of {} bytes",
                self.session.bytes_sent,
                self.session.length()
            );
            self.abort(&reason);
            return Some(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                reason,
            ));
        }

        match &self.observer {
            Some(observer) => observer.on_complete(&self.session, self.peer),
            None => debug!(
                file = %self.session.descriptor.display_name,
                start = self.session.range_start,
                end = self.session.range_end,
                "Range served"
            ),
        }
        None
    }

    fn abort(&mut self, reason: &str) {
        self.finished = true;
        match &self.observer {
            Some(observer) => observer.on_abort(&self.session, reason),
            None => debug!(
                file = %self.session.descriptor.display_name,
                sent = self.session.bytes_sent,
                reason,
                "Range transfer ended early"
            ),
        }
    }
}

impl Stream for ProgressStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        this.polled = true;

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.record_chunk(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                error!(
                    file = %this.session.descriptor.display_name,
                    error = %e,
                    "Read failed mid-transfer"
                );
                this.abort(&e.to_string());
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => Poll::Ready(this.finish().map(Err)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if self.polled {
            self.abort("connection closed by peer");
        } else {
            debug!(
                file = %self.session.descriptor.display_name,
                "Body dropped before streaming started"
            );
        }
    }
}

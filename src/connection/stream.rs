//! Read and write sides over one shared stream.
//!
//! Works like `tokio::io::split`, except that the stream stays reachable
//! through [`RawStream`] and can be released while the sides are still alive.
//! Each poll locks the stream only for the duration of that poll, so a read
//! that is pending does not block writers.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Direct access to the stream wrapped by a [`Connection`](crate::Connection).
///
/// The read task and senders cannot make progress while this guard is held.
pub type RawStream<'a, S> = MappedMutexGuard<'a, S>;

/// Slot holding the stream until the connection releases it.
pub(crate) struct Shared<S>(Arc<Mutex<Option<S>>>);

impl<S> Shared<S> {
    /// Borrow the stream, or `None` once it has been released.
    pub(crate) fn lock(&self) -> Option<RawStream<'_, S>> {
        MutexGuard::try_map(self.0.lock(), Option::as_mut).ok()
    }

    /// Drop the stream, closing the transport. Returns whether it was still held.
    pub(crate) fn release(&self) -> bool {
        let stream = self.0.lock().take();
        stream.is_some()
    }
}

pub(crate) fn split<S>(stream: S) -> (Shared<S>, ReadSide<S>, WriteSide<S>) {
    let slot = Arc::new(Mutex::new(Some(stream)));
    (
        Shared(Arc::clone(&slot)),
        ReadSide(Arc::clone(&slot)),
        WriteSide(slot),
    )
}

/// Reads end of stream once the stream is released.
pub(crate) struct ReadSide<S>(Arc<Mutex<Option<S>>>);

/// Fails with `NotConnected` once the stream is released.
pub(crate) struct WriteSide<S>(Arc<Mutex<Option<S>>>);

fn released() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "stream released")
}

impl<S: AsyncRead + Unpin> AsyncRead for ReadSide<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.0.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_read(cx, buf),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for WriteSide<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.0.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_write(cx, buf),
            None => Poll::Ready(Err(released())),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match self.0.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
            None => Poll::Ready(Err(released())),
        }
    }

    fn is_write_vectored(&self) -> bool {
        self.0
            .lock()
            .as_ref()
            .is_some_and(AsyncWrite::is_write_vectored)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.0.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_flush(cx),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.0.lock().as_mut() {
            Some(stream) => Pin::new(stream).poll_shutdown(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}

//! Message framing over async byte streams.
//!
//! A [`Framer`] turns the raw byte stream into discrete messages. The read
//! task of a [`Connection`](crate::Connection) calls it repeatedly, one
//! message per call, and hands every message to the data handler.

mod line;

pub use line::LineFramer;

use std::future::Future;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::config::Limits;
use crate::error::Result;

/// Decodes one complete message per call from a byte stream.
///
/// Implementations may block on the reader while bytes accumulate. Errors
/// from the reader should be propagated unchanged (converted with `?`), so
/// the connection can tell transient, closed and genuine failures apart.
///
/// Keeping partially read bytes in `self` rather than in locals makes a
/// framer resumable after a transient error.
///
/// ## Example
///
/// ```rust,ignore
/// use bytes::Bytes;
/// use nett::{Framer, Result};
/// use tokio::io::{AsyncRead, AsyncReadExt};
///
/// /// Messages prefixed with a big-endian `u16` length.
/// struct LengthPrefixed;
///
/// impl Framer for LengthPrefixed {
///     async fn read_frame<R>(&mut self, reader: &mut R) -> Result<Bytes>
///     where
///         R: AsyncRead + Unpin + Send,
///     {
///         let len = reader.read_u16().await? as usize;
///         let mut buf = vec![0u8; len];
///         reader.read_exact(&mut buf).await?;
///         Ok(Bytes::from(buf))
///     }
/// }
/// ```
pub trait Framer: Send + 'static {
    /// Read the next complete message from `reader`.
    fn read_frame<R>(&mut self, reader: &mut R) -> impl Future<Output = Result<Bytes>> + Send
    where
        R: AsyncRead + Unpin + Send;

    /// Bound any internal buffering by the connection's limits.
    ///
    /// Called once by [`Connection::with_config`](crate::Connection::with_config)
    /// before the first read. Framers that accumulate bytes across reads
    /// should stop at `limits.max_message_size` rather than wait for a
    /// complete message.
    fn apply_limits(&mut self, limits: &Limits) {
        let _ = limits;
    }
}

impl<F: Framer> Framer for Box<F> {
    fn read_frame<R>(&mut self, reader: &mut R) -> impl Future<Output = Result<Bytes>> + Send
    where
        R: AsyncRead + Unpin + Send,
    {
        (**self).read_frame(reader)
    }

    fn apply_limits(&mut self, limits: &Limits) {
        (**self).apply_limits(limits);
    }
}

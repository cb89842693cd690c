use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::framing::Framer;

const NEW_LINE: u8 = b'\n';

/// Splits the stream into `\n` terminated lines.
///
/// Each message is one line including its terminator. The maximum line length
/// is the smaller of [`max_length`](Self::max_length) and the limits of the
/// connection it is attached to. Bytes are consumed one
/// at a time, so the connection's buffered reader keeps this cheap.
///
/// A line that is cut short by a transient error is kept and completed by the
/// next call. End of stream in the middle of a line drops the partial line and
/// reports [`Error::Eof`].
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    max_length: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a line framer bounded by the default message limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_length(Limits::default().max_message_size)
    }

    /// Create a line framer that rejects lines longer than `max_length` bytes,
    /// terminator included.
    #[must_use]
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_length,
        }
    }

    /// Maximum accepted line length.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Framer for LineFramer {
    async fn read_frame<R>(&mut self, reader: &mut R) -> Result<Bytes>
    where
        R: AsyncRead + Unpin + Send,
    {
        loop {
            let byte = match reader.read_u8().await {
                Ok(byte) => byte,
                Err(err) => {
                    let err = Error::from(err);
                    if !err.is_transient() {
                        self.buf.clear();
                    }
                    return Err(err);
                }
            };

            if self.buf.len() >= self.max_length {
                let size = self.buf.len() + 1;
                self.buf.clear();
                return Err(Error::MessageTooLarge {
                    size,
                    max: self.max_length,
                });
            }

            self.buf.put_u8(byte);
            if byte == NEW_LINE {
                return Ok(self.buf.split().freeze());
            }
        }
    }

    fn apply_limits(&mut self, limits: &Limits) {
        self.max_length = self.max_length.min(limits.max_message_size);
    }
}

//! Error types for wrapped connections.
//!
//! Transport errors are mapped into [`Error`] once, at the boundary, and every
//! call site classifies them through [`Error::kind`] instead of inspecting raw
//! I/O errors again.

use std::io;

use thiserror::Error;

/// Result type alias for connection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading from or writing to a connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The operation was attempted on a connection that is already closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The peer ended the stream.
    #[error("End of stream")]
    Eof,

    /// I/O error reported by the underlying stream.
    #[error("I/O error ({kind:?}): {message}")]
    Io {
        /// Kind reported by the transport.
        kind: io::ErrorKind,
        /// Transport error message.
        message: String,
    },

    /// Message size exceeds configured maximum.
    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge {
        /// Actual (or accumulated) message size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// A framer rejected the bytes it read.
    #[error("Framing error: {0}")]
    Framing(String),
}

/// How the connection reacts to an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Expected to resolve on retry; suppressed everywhere.
    Transient,
    /// End of stream or use of a closed stream; ends the read loop quietly.
    Closed,
    /// Any other failure; reported to the error handler or the caller.
    Other,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConnectionClosed | Error::Eof => ErrorKind::Closed,
            Error::Io { kind, .. } if is_transient_io(*kind) => ErrorKind::Transient,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this error is a temporary condition.
    #[must_use]
    #[inline]
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Check if this error signals a closed or finished stream.
    #[must_use]
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.kind() == ErrorKind::Closed
    }
}

fn is_transient_io(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::Eof,
            kind => Error::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MessageTooLarge {
            size: 20_000_000,
            max: 16_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Message too large: 20000000 bytes (max: 16000000)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: io::ErrorKind::BrokenPipe,
                ..
            }
        ));
    }

    #[test]
    fn test_unexpected_eof_maps_to_eof() {
        let err: Error = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert_eq!(err, Error::Eof);
    }

    #[test]
    fn test_transient_kinds() {
        for kind in [
            io::ErrorKind::Interrupted,
            io::ErrorKind::WouldBlock,
            io::ErrorKind::TimedOut,
        ] {
            let err: Error = io::Error::from(kind).into();
            assert_eq!(err.kind(), ErrorKind::Transient, "{kind:?}");
            assert!(err.is_transient());
            assert!(!err.is_closed());
        }
    }

    #[test]
    fn test_closed_kinds() {
        assert_eq!(Error::Eof.kind(), ErrorKind::Closed);
        assert_eq!(Error::ConnectionClosed.kind(), ErrorKind::Closed);
        assert!(Error::ConnectionClosed.is_closed());
    }

    #[test]
    fn test_peer_failures_are_genuine() {
        for kind in [
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            let err: Error = io::Error::from(kind).into();
            assert_eq!(err.kind(), ErrorKind::Other, "{kind:?}");
        }
        assert_eq!(Error::Framing("bad".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn test_error_clone() {
        let err = Error::Eof;
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}

//! Lifecycle state of a wrapped connection.

use std::fmt;

/// Where a [`Connection`](crate::Connection) is in its lifecycle.
///
/// Derived on demand from the close signal and the outstanding background
/// work; it is never stored. A connection moves `Open`, then `Closing` as soon
/// as it is closed (by [`close`](crate::Connection::close), a failed send, or
/// the read task stopping), then `Closed` once the read task and every
/// asynchronous send have finished. A send started while `Closed` moves it
/// back to `Closing` until that send has reported its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ConnectionState {
    /// Messages are read and sends reach the stream.
    #[default]
    Open,
    /// Closed; background tasks are still winding down.
    Closing,
    /// Closed with nothing left running.
    Closed,
}

impl ConnectionState {
    /// Whether background tasks may still be running, so
    /// [`close`](crate::Connection::close) has something to wait for.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether a send is written to the stream rather than rejected with
    /// [`Error::ConnectionClosed`](crate::Error::ConnectionClosed).
    #[must_use]
    pub const fn can_send(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Lowercase name, as used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_connection_is_open() {
        assert_eq!(ConnectionState::default(), ConnectionState::Open);
    }

    #[test]
    fn test_only_open_accepts_sends() {
        let accepts: Vec<_> = [
            ConnectionState::Open,
            ConnectionState::Closing,
            ConnectionState::Closed,
        ]
        .iter()
        .map(ConnectionState::can_send)
        .collect();
        assert_eq!(accepts, [true, false, false]);
    }

    #[test]
    fn test_closed_has_nothing_to_wait_for() {
        assert!(ConnectionState::Open.is_active());
        assert!(ConnectionState::Closing.is_active());
        assert!(!ConnectionState::Closed.is_active());
    }

    #[test]
    fn test_display_matches_log_name() {
        assert_eq!(ConnectionState::Closing.to_string(), "closing");
        assert_eq!(
            format!("{}", ConnectionState::Open),
            ConnectionState::Open.as_str()
        );
    }
}

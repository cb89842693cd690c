//! # nett - Event-driven connections over async byte streams
//!
//! `nett` wraps a duplex byte stream (a TCP socket, a Unix socket, an
//! in-memory pipe) into a [`Connection`] that reads messages in the
//! background and reports them to handlers.
//!
//! ## Features
//!
//! - **Pluggable framing** through the [`Framer`] trait, with a line framer included
//! - **Replaceable handlers** for data, errors and closure, no-op by default
//! - **Direct and background sends** with transient errors absorbed
//! - **Orderly shutdown**: [`Connection::close`] waits for the read task and
//!   every pending background send
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nett::{Connection, DataHandler, LineFramer};
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:7000").await?;
//! let conn = Connection::wrap(stream, LineFramer::new());
//!
//! conn.on_data(DataHandler::new(|_conn, line| async move {
//!     println!("Received: {:?}", line);
//! }));
//! conn.send("ping\n").await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod framing;

pub use config::{Config, Limits};
pub use connection::{
    ClosedHandler, Connection, ConnectionState, DataHandler, ErrorHandler, RawStream,
};
pub use error::{Error, ErrorKind, Result};
pub use framing::{Framer, LineFramer};

//! Event-driven connection wrapper.
//!
//! This module provides the core `Connection` type: a background read task
//! that frames incoming bytes into messages, replaceable handlers for data,
//! errors and closure, direct and background send paths, and a close
//! operation that waits for all background work.
//!
//! ## Connection Lifecycle
//!
//! 1. **Open** - Stream wrapped, read task running
//! 2. **Closing** - Stream closed, read task or sends still finishing
//! 3. **Closed** - No background work left; the closed handler has been
//!    scheduled exactly once
//!
//! ## Example
//!
//! ```rust,ignore
//! use nett::{ClosedHandler, Connection, DataHandler, LineFramer};
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:7000").await?;
//! let conn = Connection::wrap(stream, LineFramer::new());
//!
//! conn.on_data(DataHandler::new(|conn, line| async move {
//!     // Echo every line back.
//!     let _ = conn.send(line).await;
//! }));
//! conn.on_closed(ClosedHandler::new(|conn| async move {
//!     println!("connection {} closed", conn.id());
//! }));
//!
//! conn.send_async("hello\n");
//! conn.close().await;
//! ```

mod handler;
mod state;
mod stream;

pub use handler::{ClosedHandler, DataHandler, ErrorHandler};
pub use state::ConnectionState;
pub use stream::RawStream;

#[allow(clippy::module_inception)]
mod connection;

pub use connection::Connection;

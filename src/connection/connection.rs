use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, debug_span, trace, warn};

use crate::config::{Config, Limits};
use crate::connection::ConnectionState;
use crate::connection::handler::{ClosedHandler, DataHandler, ErrorHandler, Handlers};
use crate::connection::stream::{self, RawStream, ReadSide, Shared, WriteSide};
use crate::error::{Error, ErrorKind, Result};
use crate::framing::Framer;

tokio::task_local! {
    /// Id of the connection that spawned the task currently running.
    static OWNER: u64;
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// An event-driven wrapper around an async byte stream.
///
/// `Connection` owns the stream and runs one background read task that
/// decodes messages with a [`Framer`] and hands them to the data handler.
/// Errors and the end of the connection are reported through the error and
/// closed handlers. All handlers default to no-ops and can be replaced at any
/// time.
///
/// `Connection` is a cheap handle: clones share the same stream, handlers and
/// background tasks. Handlers receive a clone so they can reply or close.
///
/// ## Type Parameters
///
/// - `S`: The underlying async I/O stream (e.g., `TcpStream`, `DuplexStream`)
///
/// ## Example
///
/// ```rust,ignore
/// use nett::{Connection, DataHandler, LineFramer};
///
/// let stream = tokio::net::TcpStream::connect("localhost:7000").await?;
/// let conn = Connection::wrap(stream, LineFramer::new());
///
/// conn.on_data(DataHandler::new(|_conn, line| async move {
///     println!("Received: {:?}", line);
/// }));
///
/// conn.send("hello\n").await?;
/// conn.close().await;
/// ```
pub struct Connection<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    id: u64,
    stream: Shared<S>,
    writer: tokio::sync::Mutex<WriteSide<S>>,
    handlers: Mutex<Handlers<S>>,
    closed: CancellationToken,
    tasks: TaskTracker,
    limits: Limits,
}

impl<S> Clone for Connection<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<S> Connection<S> {
    /// Process-unique identifier of this connection.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        if !self.inner.closed.is_cancelled() {
            ConnectionState::Open
        } else if self.inner.tasks.is_empty() {
            ConnectionState::Closed
        } else {
            ConnectionState::Closing
        }
    }

    /// Check if the connection has been closed.
    ///
    /// The transport itself is released shortly after, when the read task
    /// stops.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_cancelled()
    }

    /// Access the wrapped stream.
    ///
    /// Meant for inspection (addresses, socket options). Reads and writes
    /// through the guard bypass the framer and race the background tasks.
    /// Drop the guard promptly: the connection cannot do I/O while it is held.
    ///
    /// Returns `None` once the read task has stopped and released the stream.
    pub fn raw(&self) -> Option<RawStream<'_, S>> {
        self.inner.stream.lock()
    }

    /// Register the handler for decoded messages.
    ///
    /// Replaces the current handler; `None` installs the no-op handler.
    pub fn on_data(&self, handler: impl Into<Option<DataHandler<S>>>) {
        self.inner.handlers.lock().data = handler.into().unwrap_or_default();
    }

    /// Register the handler for genuine read and asynchronous send errors.
    ///
    /// Replaces the current handler; `None` installs the no-op handler.
    pub fn on_err(&self, handler: impl Into<Option<ErrorHandler<S>>>) {
        self.inner.handlers.lock().err = handler.into().unwrap_or_default();
    }

    /// Register the handler run once when the connection has closed.
    ///
    /// Replaces the current handler; `None` installs the no-op handler.
    pub fn on_closed(&self, handler: impl Into<Option<ClosedHandler<S>>>) {
        self.inner.handlers.lock().closed = handler.into().unwrap_or_default();
    }

    fn close_stream(&self) {
        self.inner.closed.cancel();
    }

    fn in_own_task(&self) -> bool {
        OWNER
            .try_with(|owner| *owner == self.inner.id)
            .unwrap_or(false)
    }

    async fn notify_data(&self, data: Bytes) {
        let handler = self.inner.handlers.lock().data.clone();
        handler.call(self.clone(), data).await;
    }

    async fn notify_err(&self, err: Error) {
        let handler = self.inner.handlers.lock().err.clone();
        handler.call(self.clone(), err).await;
    }

    async fn notify_closed(&self) {
        let handler = self.inner.handlers.lock().closed.clone();
        handler.call(self.clone()).await;
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Wrap `stream` and start reading messages with `framer`.
    ///
    /// Returns immediately; the read task starts in the background.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn wrap<F: Framer>(stream: S, framer: F) -> Self {
        Self::with_config(stream, framer, Config::default())
    }

    /// Wrap `stream` with a custom configuration.
    ///
    /// The framer is bounded by `config.limits` before the first read.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn with_config<F: Framer>(stream: S, mut framer: F, config: Config) -> Self {
        framer.apply_limits(&config.limits);
        let (shared, read_side, write_side) = stream::split(stream);
        let conn = Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                stream: shared,
                writer: tokio::sync::Mutex::new(write_side),
                handlers: Mutex::new(Handlers::default()),
                closed: CancellationToken::new(),
                tasks: TaskTracker::new(),
                limits: config.limits,
            }),
        };

        let reader = BufReader::with_capacity(config.read_buffer_size, read_side);
        let span = debug_span!("connection", id = conn.id());
        let task = OWNER.scope(conn.id(), conn.clone().run_read(reader, framer));
        conn.inner.tasks.spawn(task.instrument(span));

        conn
    }

    /// Send `data` to the peer.
    ///
    /// Empty data is written as-is. Transient write errors are ignored and
    /// reported as success. Any other failure closes the stream and is
    /// returned; the error handler is not called.
    ///
    /// ## Errors
    ///
    /// - `Error::ConnectionClosed` if the connection is closed, before or
    ///   during the write
    /// - I/O errors from the underlying stream
    pub async fn send(&self, data: impl AsRef<[u8]>) -> Result<()> {
        match self.write(data.as_ref()).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_transient() => {
                trace!(id = self.id(), error = %err, "suppressed transient write error");
                Ok(())
            }
            Err(err) => {
                debug!(id = self.id(), error = %err, "send failed, closing stream");
                self.close_stream();
                Err(err)
            }
        }
    }

    /// Send `data` from a background task.
    ///
    /// Returns immediately. A failure is reported to the error handler.
    /// [`close`](Self::close) waits for the send to finish. Concurrent
    /// asynchronous sends may reach the peer in any order.
    pub fn send_async(&self, data: impl Into<Bytes>) {
        let conn = self.clone();
        let data = data.into();
        let task = async move {
            if let Err(err) = conn.send(data).await {
                warn!(id = conn.id(), error = %err, "async send failed");
                conn.notify_err(err).await;
            }
        };
        let span = debug_span!("send_async", id = self.id());
        self.inner
            .tasks
            .spawn(OWNER.scope(self.id(), task).instrument(span));
    }

    /// Close the stream and wait for background work to finish.
    ///
    /// Waits for the read task and every asynchronous send. The read task
    /// shuts the stream down and drops it, so the transport is closed once
    /// `close` returns. Safe to call repeatedly and concurrently. The closed
    /// handler runs once, at the latest shortly after the first `close`
    /// returns.
    ///
    /// Called from a handler running on this connection's own read or send
    /// task, `close` closes the stream but returns without waiting.
    pub async fn close(&self) {
        let state = self.state();
        if !state.is_active() {
            return;
        }

        debug!(id = self.id(), %state, "close requested");
        self.close_stream();
        self.inner.tasks.close();

        if self.in_own_task() {
            debug!(id = self.id(), "close called from a connection task, not waiting");
            return;
        }

        self.inner.tasks.wait().await;
        debug!(id = self.id(), "connection closed");
    }

    async fn write(&self, data: &[u8]) -> Result<()> {
        if !self.state().can_send() {
            return Err(Error::ConnectionClosed);
        }

        let closed = &self.inner.closed;
        tokio::select! {
            biased;
            _ = closed.cancelled() => Err(Error::ConnectionClosed),
            result = async {
                let mut writer = self.inner.writer.lock().await;
                writer.write_all(data).await?;
                writer.flush().await?;
                Ok::<(), std::io::Error>(())
            } => result.map_err(Error::from),
        }
    }

    async fn run_read<F: Framer>(self, mut reader: BufReader<ReadSide<S>>, mut framer: F) {
        debug!("read loop started");

        loop {
            let result = tokio::select! {
                biased;
                _ = self.inner.closed.cancelled() => Err(Error::ConnectionClosed),
                result = framer.read_frame(&mut reader) => result,
            };

            let message = match result {
                Ok(message) => message,
                Err(err) => match err.kind() {
                    ErrorKind::Transient => {
                        trace!(error = %err, "suppressed transient read error");
                        tokio::task::yield_now().await;
                        continue;
                    }
                    ErrorKind::Closed => {
                        debug!(reason = %err, "read loop stopping");
                        break;
                    }
                    ErrorKind::Other => {
                        warn!(error = %err, "read failed");
                        self.notify_err(err).await;
                        break;
                    }
                },
            };

            if message.is_empty() {
                continue;
            }

            if let Err(err) = self.inner.limits.check_message_size(message.len()) {
                warn!(error = %err, "decoded message rejected");
                self.notify_err(err).await;
                break;
            }

            trace!(len = message.len(), "dispatching message");
            self.notify_data(message).await;
        }

        self.close_stream();
        if let Err(err) = self.inner.writer.lock().await.shutdown().await {
            trace!(error = %err, "stream shutdown failed");
        }
        if self.inner.stream.release() {
            trace!("stream released");
        }

        let conn = self.clone();
        tokio::spawn(async move { conn.notify_closed().await }.in_current_span());
        debug!("read loop finished");
    }
}

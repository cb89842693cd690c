//! Replaceable event handlers.
//!
//! A handler slot is either a no-op or a registered callback. Registering
//! "no handler" stores the no-op, so dispatch never has to check for a
//! missing callback.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_core::future::BoxFuture;

use crate::connection::Connection;
use crate::error::Error;

type DataFn<S> = dyn Fn(Connection<S>, Bytes) -> BoxFuture<'static, ()> + Send + Sync;
type ErrorFn<S> = dyn Fn(Connection<S>, Error) -> BoxFuture<'static, ()> + Send + Sync;
type ClosedFn<S> = dyn Fn(Connection<S>) -> BoxFuture<'static, ()> + Send + Sync;

enum Slot<F: ?Sized> {
    Noop,
    Set(Arc<F>),
}

impl<F: ?Sized> Slot<F> {
    fn is_noop(&self) -> bool {
        matches!(self, Slot::Noop)
    }
}

impl<F: ?Sized> Clone for Slot<F> {
    fn clone(&self) -> Self {
        match self {
            Slot::Noop => Slot::Noop,
            Slot::Set(f) => Slot::Set(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Noop => write!(f, "Noop"),
            Slot::Set(_) => write!(f, "Set"),
        }
    }
}

/// Handler for decoded messages.
///
/// The read task awaits the handler before decoding the next message, so
/// invocations for one connection never overlap and follow decode order.
///
/// ## Example
///
/// ```rust,ignore
/// conn.on_data(DataHandler::new(|conn, line| async move {
///     let _ = conn.send(line).await;
/// }));
/// ```
pub struct DataHandler<S>(Slot<DataFn<S>>);

impl<S> DataHandler<S> {
    /// Wrap an async callback.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        S: 'static,
        F: Fn(Connection<S>, Bytes) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let f: Arc<DataFn<S>> =
            Arc::new(move |conn: Connection<S>, data: Bytes| -> BoxFuture<'static, ()> {
                Box::pin(handler(conn, data))
            });
        Self(Slot::Set(f))
    }

    /// A handler that drops every message.
    #[must_use]
    pub fn noop() -> Self {
        Self(Slot::Noop)
    }

    /// Check if this is the no-op handler.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.0.is_noop()
    }

    pub(crate) async fn call(self, conn: Connection<S>, data: Bytes) {
        if let Slot::Set(f) = self.0 {
            f(conn, data).await;
        }
    }
}

/// Handler for genuine read and asynchronous send errors.
pub struct ErrorHandler<S>(Slot<ErrorFn<S>>);

impl<S> ErrorHandler<S> {
    /// Wrap an async callback.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        S: 'static,
        F: Fn(Connection<S>, Error) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let f: Arc<ErrorFn<S>> =
            Arc::new(move |conn: Connection<S>, err: Error| -> BoxFuture<'static, ()> {
                Box::pin(handler(conn, err))
            });
        Self(Slot::Set(f))
    }

    /// A handler that ignores every error.
    #[must_use]
    pub fn noop() -> Self {
        Self(Slot::Noop)
    }

    /// Check if this is the no-op handler.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.0.is_noop()
    }

    pub(crate) async fn call(self, conn: Connection<S>, err: Error) {
        if let Slot::Set(f) = self.0 {
            f(conn, err).await;
        }
    }
}

/// Handler run once after the read task has stopped and the stream is closed.
pub struct ClosedHandler<S>(Slot<ClosedFn<S>>);

impl<S> ClosedHandler<S> {
    /// Wrap an async callback.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        S: 'static,
        F: Fn(Connection<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let f: Arc<ClosedFn<S>> =
            Arc::new(move |conn: Connection<S>| -> BoxFuture<'static, ()> {
                Box::pin(handler(conn))
            });
        Self(Slot::Set(f))
    }

    /// A handler that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self(Slot::Noop)
    }

    /// Check if this is the no-op handler.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.0.is_noop()
    }

    pub(crate) async fn call(self, conn: Connection<S>) {
        if let Slot::Set(f) = self.0 {
            f(conn).await;
        }
    }
}

macro_rules! impl_handler_traits {
    ($($handler:ident),*) => {$(
        impl<S> Default for $handler<S> {
            fn default() -> Self {
                Self::noop()
            }
        }

        impl<S> Clone for $handler<S> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<S> fmt::Debug for $handler<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($handler)).field(&self.0).finish()
            }
        }
    )*};
}

impl_handler_traits!(DataHandler, ErrorHandler, ClosedHandler);

/// The three handler slots of one connection.
pub(crate) struct Handlers<S> {
    pub(crate) data: DataHandler<S>,
    pub(crate) err: ErrorHandler<S>,
    pub(crate) closed: ClosedHandler<S>,
}

impl<S> Default for Handlers<S> {
    fn default() -> Self {
        Self {
            data: DataHandler::noop(),
            err: ErrorHandler::noop(),
            closed: ClosedHandler::noop(),
        }
    }
}

//! Records handler invocations for assertions.

use bytes::Bytes;
use nett::{ClosedHandler, Connection, DataHandler, Error, ErrorHandler};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use super::TIMEOUT;

/// One handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Data(Bytes),
    Err(Error),
    Closed,
}

/// Receives the events of one connection.
pub struct Events {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Events {
    /// Register recording handlers on all three slots of `conn`.
    pub fn attach<S>(conn: &Connection<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        let data_tx = tx.clone();
        conn.on_data(DataHandler::new(move |_conn, data| {
            let tx = data_tx.clone();
            async move {
                let _ = tx.send(Event::Data(data));
            }
        }));

        let err_tx = tx.clone();
        conn.on_err(ErrorHandler::new(move |_conn, err| {
            let tx = err_tx.clone();
            async move {
                let _ = tx.send(Event::Err(err));
            }
        }));

        conn.on_closed(ClosedHandler::new(move |_conn| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(Event::Closed);
            }
        }));

        Self { rx }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Option<Event> {
        tokio::time::timeout(TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for an event")
    }

    /// Wait for the next event and expect it to be a message.
    pub async fn data(&mut self) -> Bytes {
        match self.next().await {
            Some(Event::Data(data)) => data,
            other => panic!("expected data, got {other:?}"),
        }
    }

    /// Wait for the next event and expect it to be the closed notification.
    pub async fn closed(&mut self) {
        match self.next().await {
            Some(Event::Closed) => {}
            other => panic!("expected closed, got {other:?}"),
        }
    }

    /// Collect the remaining events until every handler has been dropped.
    ///
    /// All handles of the connection must be dropped first.
    pub async fn rest(mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event);
        }
        events
    }
}

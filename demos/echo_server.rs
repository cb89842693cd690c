//! Line echo server.
//!
//! Run with: cargo run --example echo_server
//! Then connect with: cargo run --example line_client

use nett::{ClosedHandler, Connection, DataHandler, ErrorHandler, LineFramer};
use std::error::Error;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ADDR: &str = "127.0.0.1:9001";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,nett=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let listener = TcpListener::bind(ADDR).await?;
    info!("line echo server listening on {ADDR}");

    loop {
        let (stream, addr) = listener.accept().await?;
        info!(%addr, "new connection");

        let conn = Connection::wrap(stream, LineFramer::new());
        conn.on_data(DataHandler::new(|conn, data| async move {
            info!(id = conn.id(), bytes = data.len(), "echoing line");
            // A failed echo closes the connection; the closed handler reports it.
            let _ = conn.send(data).await;
        }));
        conn.on_err(ErrorHandler::new(move |conn, err| async move {
            error!(id = conn.id(), %addr, "connection error: {err}");
        }));
        conn.on_closed(ClosedHandler::new(move |conn| async move {
            info!(id = conn.id(), %addr, "connection closed");
        }));
    }
}

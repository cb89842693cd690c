//! Line client that sends stdin to the echo server and prints the replies.
//!
//! Run with: cargo run --example line_client
//! Requires the echo server to be running: cargo run --example echo_server

use nett::{ClosedHandler, Connection, DataHandler, ErrorHandler, LineFramer};
use parking_lot::Mutex;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

const ADDR: &str = "127.0.0.1:9001";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let stream = TcpStream::connect(ADDR).await?;
    println!("Connected to {ADDR}, type lines to echo (Ctrl-D to quit)");

    let conn = Connection::wrap(stream, LineFramer::new());
    let (closed_tx, closed_rx) = oneshot::channel();
    let closed_tx = Mutex::new(Some(closed_tx));

    conn.on_data(DataHandler::new(|_conn, data| async move {
        print!("< {}", String::from_utf8_lossy(&data));
    }));
    conn.on_err(ErrorHandler::new(|_conn, err| async move {
        eprintln!("connection error: {err}");
    }));
    conn.on_closed(ClosedHandler::new(move |_conn| {
        let tx = closed_tx.lock().take();
        async move {
            if let Some(tx) = tx {
                let _ = tx.send(());
            }
        }
    }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(mut line) = lines.next_line().await? {
        line.push('\n');
        conn.send(line).await?;
    }

    conn.close().await;
    let _ = closed_rx.await;
    println!("Disconnected");
    Ok(())
}

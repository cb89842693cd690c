//! Connected pairs of wrapped streams.

use nett::{Connection, LineFramer};
use tokio::io::DuplexStream;
use tokio::net::{TcpListener, TcpStream};

/// Two connections joined by an in-memory pipe, both framing lines.
pub fn duplex_pair() -> (Connection<DuplexStream>, Connection<DuplexStream>) {
    let (a, b) = tokio::io::duplex(64 * 1024);
    (
        Connection::wrap(a, LineFramer::new()),
        Connection::wrap(b, LineFramer::new()),
    )
}

/// Two connections joined by a loopback TCP socket, both framing lines.
///
/// The first connection is the dialing side.
pub async fn tcp_pair() -> (Connection<TcpStream>, Connection<TcpStream>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let client = client.unwrap();
    let (server, _) = accepted.unwrap();

    (
        Connection::wrap(client, LineFramer::new()),
        Connection::wrap(server, LineFramer::new()),
    )
}

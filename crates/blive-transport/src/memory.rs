//! In-memory transport for tests and in-process embedding.
//!
//! Uses Tokio channels instead of network sockets, so a test can play the
//! chat server's side of the conversation without opening a port.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, Mutex};

use crate::{Connection, Connector, TransportError};

/// One half of an in-memory duplex connection.
///
/// The outbound sender lives behind an `Option` so `close()` can drop it:
/// that ends the peer's channel, and the peer's `recv()` sees `Ok(None)`
/// right away instead of waiting for every clone of this half to go away.
#[derive(Clone)]
pub struct MemoryConnection {
    to_peer: Arc<StdMutex<Option<mpsc::UnboundedSender<Vec<u8>>>>>,
    from_peer: Arc<Mutex<mpsc::UnboundedReceiver<Vec<u8>>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryConnection {
    /// Creates two connected halves. Bytes sent on one arrive on the other.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();

        let a = Self {
            to_peer: Arc::new(StdMutex::new(Some(a_tx))),
            from_peer: Arc::new(Mutex::new(b_rx)),
            closed: Arc::new(AtomicBool::new(false)),
        };
        let b = Self {
            to_peer: Arc::new(StdMutex::new(Some(b_tx))),
            from_peer: Arc::new(Mutex::new(a_rx)),
            closed: Arc::new(AtomicBool::new(false)),
        };
        (a, b)
    }
}

impl Connection for MemoryConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let sender = self.to_peer.lock().unwrap().clone();
        match sender {
            Some(tx) => tx.send(data.to_vec()).map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        }
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.from_peer.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.closed.store(true, Ordering::SeqCst);
        // Dropping the sender ends the peer's recv stream.
        self.to_peer.lock().unwrap().take();
        Ok(())
    }
}

/// What a [`MemoryConnector`] saw for one `connect` call: the URL and
/// headers the session asked for, plus the server-side connection half.
pub struct MemoryEndpoint {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub peer: MemoryConnection,
}

/// A [`Connector`] that hands out in-memory connections.
///
/// Each `connect` call produces a fresh pair; the far half is delivered on
/// the channel returned by [`MemoryConnector::new`] so the test can speak
/// for the server.
#[derive(Clone)]
pub struct MemoryConnector {
    accepted: mpsc::UnboundedSender<MemoryEndpoint>,
}

impl MemoryConnector {
    /// Creates a connector and the stream of server-side endpoints.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemoryEndpoint>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { accepted: tx }, rx)
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;
    type Error = TransportError;

    async fn connect(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<MemoryConnection, TransportError> {
        let (local, peer) = MemoryConnection::pair();
        self.accepted
            .send(MemoryEndpoint {
                url: url.to_string(),
                headers: headers.to_vec(),
                peer,
            })
            .map_err(|_| TransportError::ConnectFailed("no acceptor".into()))?;
        Ok(local)
    }
}

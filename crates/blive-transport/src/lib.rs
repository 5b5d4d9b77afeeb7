//! Transport abstraction layer for the blive client.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! how the session reaches the chat endpoint, plus two implementations:
//!
//! - [`WsConnector`]: real WebSocket via `tokio-tungstenite`
//!   (behind the default `websocket` feature)
//! - [`MemoryConnector`]: channel-backed duplex for tests and
//!   in-process embedding

use std::future::Future;

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use memory::{MemoryConnection, MemoryConnector, MemoryEndpoint};
#[cfg(feature = "websocket")]
pub use websocket::{WsConnection, WsConnector};

/// Opens a socket to an endpoint URL.
///
/// The session calls this once per `connect()`; retry policy lives with
/// the session's owner, not here.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;
    /// The error type for connect failures.
    type Error: std::error::Error + Send + Sync;

    /// Opens a connection to `url`, sending `headers` with the handshake.
    fn connect(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// A single open connection that can send and receive byte messages.
///
/// `Clone` is part of the contract: the session hands one handle to its
/// heartbeat task and another to its reader task, so implementations are
/// expected to be cheap shared handles (`Arc` inside).
pub trait Connection: Clone + Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one binary message to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next message from the peer.
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly.
    fn recv(&self) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the connection with a normal closure.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

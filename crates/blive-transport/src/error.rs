/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint URL or a handshake header could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Opening the connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Sending data failed; the connection is considered dead.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving data failed; the connection is considered dead.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The connection was already closed.
    #[error("connection closed")]
    Closed,
}

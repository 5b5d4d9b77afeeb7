//! Error types for the session layer.
//!
//! Most things that go wrong during a live connection are *reported*, not
//! returned: lookup problems, connect failures, and peer disconnects reach
//! the owner as status callbacks because they are operational conditions
//! the owner may retry. `SessionError` covers what is left.

/// Errors that can occur while driving a live session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The endpoint/token lookup could not produce a result.
    /// Raised by [`InfoSource`](crate::InfoSource) implementations;
    /// the session downgrades it to a status report.
    #[error("info lookup failed: {0}")]
    Lookup(String),

    /// `connect()` was called more than once. Sessions are single-use:
    /// build a new one for a new attempt.
    #[error("session already started")]
    AlreadyStarted,

    /// The auth handshake body failed to serialize.
    #[error("auth payload encode failed: {0}")]
    AuthEncode(#[from] serde_json::Error),
}

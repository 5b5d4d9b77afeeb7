//! Unified error type for the blive client.

use blive_protocol::ProtocolError;
use blive_session::SessionError;
use blive_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `blive` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate; `#[from]` on
/// each variant lets `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BliveError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (payload decoding).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (lookup, misuse).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectFailed("refused".into());
        let top: BliveError = err.into();
        assert!(matches!(top, BliveError::Transport(_)));
        assert!(top.to_string().contains("refused"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnsupportedVersion(9);
        let top: BliveError = err.into();
        assert!(matches!(top, BliveError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AlreadyStarted;
        let top: BliveError = err.into();
        assert!(matches!(top, BliveError::Session(_)));
    }
}

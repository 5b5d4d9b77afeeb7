//! Error types for the protocol layer.
//!
//! These cover the one place frame handling can genuinely fail: decoding a
//! compressed body. Frame scanning and event extraction are permissive by
//! design and report absence, not errors.

/// Errors that can occur while decoding a frame body.
///
/// Callers treat every variant as "this frame carried no payload" and move
/// on to the next frame; none of them is fatal to a connection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The zlib stream in a version-2 body is corrupt.
    #[error("zlib inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    /// The Brotli stream in a version-3 body is corrupt or truncated.
    #[error("brotli decode failed: {0}")]
    Brotli(#[source] std::io::Error),

    /// The frame declares a protocol version this client does not decode.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u16),
}

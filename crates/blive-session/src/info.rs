//! The endpoint/token lookup seam.
//!
//! The session does not know how to find its chat endpoint; the
//! surrounding application does (an authenticated HTTP API call in
//! practice). [`InfoSource`] is the seam: one async method from room id to
//! hosts-plus-token. Tests implement it with a canned value.

use std::future::Future;

use serde::Deserialize;

use crate::SessionError;

/// One candidate chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DanmuHost {
    /// Hostname of the chat broker.
    pub host: String,
    /// TLS WebSocket port.
    pub wss_port: u16,
}

/// Everything needed to open and authenticate one live connection.
///
/// The serde attributes match the upstream lookup response, so an HTTP
/// `InfoSource` can deserialize the API body straight into this type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectInfo {
    /// Candidate endpoints, best first. The session uses the first one.
    #[serde(rename = "host_list", default)]
    pub hosts: Vec<DanmuHost>,
    /// Per-room auth token, sent in the handshake frame.
    #[serde(default)]
    pub token: String,
}

/// Resolves a room id to its connection endpoint and token.
///
/// `Send + Sync + 'static` because the session may be driven from any
/// runtime thread, and the future is `Send` so `connect()` stays `Send`.
pub trait InfoSource: Send + Sync + 'static {
    /// Looks up the endpoint and token for `room_id`.
    ///
    /// An `Err` here is a transient upstream condition; the session
    /// reports it via the status callback and gives up this attempt.
    fn lookup(
        &self,
        room_id: u64,
    ) -> impl Future<Output = Result<ConnectInfo, SessionError>> + Send;
}

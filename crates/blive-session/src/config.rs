//! Session configuration.

use std::time::Duration;

/// Tunables for one live session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fixed period of the keep-alive heartbeat. The first heartbeat is
    /// sent immediately after the auth frame, then one per period.
    ///
    /// Default: 30 seconds (the broker drops connections that stay silent
    /// for about a minute).
    pub heartbeat_period: Duration,

    /// `User-Agent` header sent with the WebSocket handshake.
    pub user_agent: String,

    /// `Referer` header sent with the WebSocket handshake; the broker
    /// rejects handshakes without a plausible one.
    pub referer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_period: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) blive/0.1".to_string(),
            referer: "https://live.bilibili.com/".to_string(),
        }
    }
}

//! Connection session for the blive live-room client.
//!
//! This crate orchestrates the pure protocol layer over a transport:
//!
//! 1. **Lookup**: resolve room id to endpoint and token ([`InfoSource`])
//! 2. **Handshake**: open the socket, send the auth frame
//! 3. **Keep-alive**: fixed-period heartbeat on a background task
//! 4. **Dispatch**: inbound bytes to frames to payloads to
//!    [`LiveHandler`] callbacks
//!
//! # How it fits in the stack
//!
//! ```text
//! Owner (UI / feed consumer)  ← LiveHandler callbacks, status text
//!     ↕
//! Session (this crate)        ← lifecycle, heartbeat, dispatch loop
//!     ↕
//! Protocol + Transport        ← frames and sockets
//! ```

mod config;
mod error;
mod handler;
mod info;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use handler::LiveHandler;
pub use info::{ConnectInfo, DanmuHost, InfoSource};
pub use session::{LiveSession, SessionState};

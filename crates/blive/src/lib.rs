//! # blive
//!
//! Real-time message client for live-stream chat rooms: connects to a
//! room's chat broker over WebSocket, authenticates, keeps the connection
//! alive, and turns the binary frame feed (including zlib- and
//! Brotli-packed nested frames) into typed chat and super-chat events.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blive::{
//!     DanmakuEvent, LiveHandler, LiveSession, SessionConfig, SuperChatEvent,
//!     WsConnector,
//! };
//!
//! struct Printer;
//!
//! impl LiveHandler for Printer {
//!     fn on_danmaku(&self, e: &DanmakuEvent) {
//!         println!("{}", e.text);
//!     }
//!     fn on_super_chat(&self, e: &SuperChatEvent) {
//!         println!("[¥{}] {}: {}", e.price, e.user, e.message);
//!     }
//!     fn on_status(&self, s: &str) {
//!         eprintln!("* {s}");
//!     }
//! }
//!
//! # async fn run(lookup: impl blive::InfoSource) -> Result<(), blive::BliveError> {
//! let session = LiveSession::new(
//!     7734,
//!     lookup, // your InfoSource implementation
//!     WsConnector,
//!     Arc::new(Printer),
//!     SessionConfig::default(),
//! );
//! session.connect().await?;
//! // ... later:
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! The session reports operational problems (failed lookup, refused
//! socket, peer disconnect) through `on_status` and never reconnects on
//! its own; build a new session for a new attempt.

mod error;

pub use error::BliveError;

pub use blive_protocol::{
    decode_all, decode_payload, extract_event, DanmakuEvent, Frame, FrameEncoder,
    LiveEvent, OpCode, ProtocolError, SuperChatEvent, CMD_DANMAKU, CMD_SUPER_CHAT,
    DEFAULT_COLOR, HEADER_LEN,
};
pub use blive_session::{
    ConnectInfo, DanmuHost, InfoSource, LiveHandler, LiveSession, SessionConfig,
    SessionError, SessionState,
};
pub use blive_transport::{
    Connection, Connector, MemoryConnection, MemoryConnector, MemoryEndpoint,
    TransportError,
};
#[cfg(feature = "websocket")]
pub use blive_transport::{WsConnection, WsConnector};

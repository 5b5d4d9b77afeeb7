//! Wire protocol for the blive live-room client.
//!
//! This crate is the pure, synchronous half of the client:
//!
//! - **Frames** ([`Frame`], [`FrameEncoder`], [`decode_all`]): the
//!   length-prefixed binary units on the socket.
//! - **Payloads** ([`decode_payload`]): per-version body decoding
//!   (raw, zlib, Brotli). Compressed bodies hold nested frames.
//! - **Events** ([`extract_event`], [`LiveEvent`]): the typed chat and
//!   super-chat events inside decoded message payloads.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sockets, timers, or sessions.
//! It maps bytes to frames to events and back:
//!
//! ```text
//! bytes → Frame(s) → payload bytes → (nested frames…) → LiveEvent
//! ```

mod error;
mod event;
mod frame;
mod payload;

pub use error::ProtocolError;
pub use event::{
    extract_event, DanmakuEvent, LiveEvent, SuperChatEvent, CMD_DANMAKU, CMD_SUPER_CHAT,
    DEFAULT_COLOR,
};
pub use frame::{decode_all, Frame, FrameEncoder, OpCode, HEADER_LEN};
pub use payload::decode_payload;

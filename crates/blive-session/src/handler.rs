//! Owner-facing event callbacks.

use blive_protocol::{DanmakuEvent, SuperChatEvent};

/// Receives everything a live session produces.
///
/// Callbacks run synchronously on the session's reader task, in the order
/// frames arrived. Keep them cheap (push to a channel, update an atomic)
/// and never block in them.
///
/// Status strings are free-form operational text for display and logging
/// (connecting, connected, disconnected, error detail); they are not a
/// structured state machine; use
/// [`LiveSession::state`](crate::LiveSession::state) for that.
pub trait LiveHandler: Send + Sync + 'static {
    /// A chat message scrolled over the stream.
    fn on_danmaku(&self, event: &DanmakuEvent);

    /// A paid, highlighted message.
    fn on_super_chat(&self, event: &SuperChatEvent);

    /// A connection-lifecycle status line.
    fn on_status(&self, status: &str);
}

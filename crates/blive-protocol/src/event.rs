//! Typed application events extracted from decoded message payloads.
//!
//! A fully decoded `Message` frame body is UTF-8 text holding a single
//! JSON object. The object's `cmd` field names one of dozens of feed
//! commands; this client understands exactly two of them and silently
//! ignores everything else. The feed is not a trusted producer, so every
//! field access here defaults or drops rather than failing.

use serde_json::Value;

/// Default danmaku color (white) when the payload carries none.
pub const DEFAULT_COLOR: i32 = 0xFF_FFFF;

/// Command tag prefix for chat messages (`DANMU_MSG`, `DANMU_MSG:4:0:2:...`).
pub const CMD_DANMAKU: &str = "DANMU_MSG";

/// Command tag for paid, highlighted messages.
pub const CMD_SUPER_CHAT: &str = "SUPER_CHAT_MESSAGE";

/// A plain chat message scrolled over the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanmakuEvent {
    /// Message text; never blank.
    pub text: String,
    /// RGB (or ARGB) color as sent by the feed.
    pub color: i32,
}

/// A paid "super chat" message pinned above the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperChatEvent {
    /// Sender display name; may be empty.
    pub user: String,
    /// Message text; never blank.
    pub message: String,
    /// Price in the feed's integer monetary unit; no currency conversion.
    pub price: u64,
}

/// The closed set of events this client surfaces to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    Danmaku(DanmakuEvent),
    SuperChat(SuperChatEvent),
}

/// Extracts one typed event from a decoded payload, if it holds one.
///
/// Blank or unparseable text, an unrecognized command, or a required field
/// that is missing or blank all yield `None`; extraction never errors.
pub fn extract_event(payload: &[u8]) -> Option<LiveEvent> {
    let text = String::from_utf8_lossy(payload);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let obj: Value = serde_json::from_str(text).ok()?;
    let cmd = obj.get("cmd").and_then(Value::as_str).unwrap_or("");

    if cmd.starts_with(CMD_DANMAKU) {
        return extract_danmaku(&obj).map(LiveEvent::Danmaku);
    }
    if cmd == CMD_SUPER_CHAT {
        return extract_super_chat(&obj).map(LiveEvent::SuperChat);
    }
    None
}

fn extract_danmaku(obj: &Value) -> Option<DanmakuEvent> {
    let info = obj.get("info")?.as_array()?;
    let text = info.get(1)?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    // info[0] is a loosely shaped extras array; index 3 optionally holds
    // the color. Zero means the sender picked no color. A missing or
    // malformed color must not drop the text.
    let color = info
        .first()
        .and_then(Value::as_array)
        .and_then(|extra| extra.get(3))
        .and_then(Value::as_i64)
        .filter(|&c| c != 0)
        .map(|c| c as i32)
        .unwrap_or(DEFAULT_COLOR);

    Some(DanmakuEvent {
        text: text.to_string(),
        color,
    })
}

fn extract_super_chat(obj: &Value) -> Option<SuperChatEvent> {
    let data = obj.get("data")?.as_object()?;

    let message = data.get("message").and_then(Value::as_str).unwrap_or("");
    if message.trim().is_empty() {
        return None;
    }

    let user = data
        .get("user_info")
        .and_then(|u| u.get("uname"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let price = data.get("price").and_then(Value::as_u64).unwrap_or(0);

    Some(SuperChatEvent {
        user,
        message: message.to_string(),
        price,
    })
}

//! Binary frame codec for the live-room wire protocol.
//!
//! Every message on the socket is one or more *frames* packed back to back
//! with no padding. A frame is a fixed 16-byte header followed by a body:
//!
//! ```text
//! ┌────────────┬────────────┬─────────┬────────┬────────┬──────────┐
//! │ total_len  │ header_len │ version │ op     │ seq    │ body     │
//! │ u32        │ u16 (=16)  │ u16     │ i32    │ i32    │ bytes    │
//! └────────────┴────────────┴─────────┴────────┴────────┴──────────┘
//! ```
//!
//! All integers are big-endian. `version` selects how the body is decoded
//! (see [`decode_payload`](crate::decode_payload)); `op` selects what the
//! frame means (see [`OpCode`]).
//!
//! Decoding is deliberately permissive: the feed occasionally truncates a
//! tail frame mid-buffer, and the correct response is to keep the frames
//! that did arrive and drop the rest without raising an error.

use std::sync::atomic::{AtomicU32, Ordering};

/// Fixed size of the frame header in bytes.
pub const HEADER_LEN: usize = 16;

/// Frame semantics, selected by the `op` header field.
///
/// Unknown codes are carried through as [`OpCode::Other`] so the caller can
/// ignore them; an unrecognized op is never a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Client → server keep-alive, sent every heartbeat period.
    Heartbeat,
    /// Server → client heartbeat acknowledgment (carries room popularity).
    HeartbeatAck,
    /// Server → client application message; the body holds one or more
    /// JSON event payloads, possibly inside a compressed container.
    Message,
    /// Client → server authentication handshake.
    Auth,
    /// Server → client authentication acknowledgment.
    AuthAck,
    /// Any op code this client does not handle.
    Other(i32),
}

impl OpCode {
    /// Maps a raw wire value to an op code.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            2 => Self::Heartbeat,
            3 => Self::HeartbeatAck,
            5 => Self::Message,
            7 => Self::Auth,
            8 => Self::AuthAck,
            other => Self::Other(other),
        }
    }

    /// The wire value for this op code.
    pub fn raw(self) -> i32 {
        match self {
            Self::Heartbeat => 2,
            Self::HeartbeatAck => 3,
            Self::Message => 5,
            Self::Auth => 7,
            Self::AuthAck => 8,
            Self::Other(raw) => raw,
        }
    }
}

/// One decoded frame.
///
/// Only the fields a consumer acts on are retained; `total_len`,
/// `header_len`, and the sequence id are header bookkeeping that
/// [`decode_all`] validates and discards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Body interpretation tag: `0`/`1` raw, `2` zlib, `3` Brotli.
    pub version: u16,
    /// Frame semantics.
    pub op: OpCode,
    /// Body bytes (`total_len - header_len` of them on the wire).
    pub body: Vec<u8>,
}

/// Builds outbound frames, stamping each with a per-session sequence id.
///
/// The sequence starts at 1 and increments once per [`encode`](Self::encode)
/// call. The counter is atomic because the heartbeat task and the connect
/// path encode concurrently; wraparound at `u32::MAX` is accepted by the
/// server and is not treated as an error.
#[derive(Debug)]
pub struct FrameEncoder {
    seq: AtomicU32,
}

impl FrameEncoder {
    /// Creates an encoder with the sequence counter at 1.
    pub fn new() -> Self {
        Self {
            seq: AtomicU32::new(1),
        }
    }

    /// Encodes one frame: 16-byte big-endian header followed by `body`.
    pub fn encode(&self, op: OpCode, version: u16, body: &[u8]) -> Vec<u8> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let total = HEADER_LEN + body.len();

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&(total as u32).to_be_bytes());
        out.extend_from_slice(&(HEADER_LEN as u16).to_be_bytes());
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&op.raw().to_be_bytes());
        out.extend_from_slice(&seq.to_be_bytes());
        out.extend_from_slice(body);
        out
    }
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes every complete frame in `buf`, scanning from offset 0.
///
/// Scanning stops, returning the frames decoded so far and never an
/// error, as soon as a frame cannot be fully contained in the buffer:
///
/// - fewer than [`HEADER_LEN`] bytes remain,
/// - the declared `total_len` is zero, or
/// - `offset + total_len` runs past the end of the buffer.
///
/// A body whose declared range falls outside the buffer decodes as empty
/// rather than failing; the upstream feed is not trusted to be well-formed.
pub fn decode_all(buf: &[u8]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut off = 0usize;

    while off + HEADER_LEN <= buf.len() {
        let total = read_u32(buf, off) as usize;
        if total == 0 || off + total > buf.len() {
            break;
        }
        let header_len = read_u16(buf, off + 4) as usize;
        let version = read_u16(buf, off + 6);
        let op = OpCode::from_raw(read_i32(buf, off + 8));

        let body_off = off + header_len;
        let body_len = total.saturating_sub(header_len);
        let body = if body_len > 0 && body_off + body_len <= buf.len() {
            buf[body_off..body_off + body_len].to_vec()
        } else {
            Vec::new()
        };

        frames.push(Frame { version, op, body });
        off += total;
    }

    frames
}

fn read_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_be_bytes(buf[off..off + 4].try_into().unwrap())
}

fn read_i32(buf: &[u8], off: usize) -> i32 {
    i32::from_be_bytes(buf[off..off + 4].try_into().unwrap())
}

fn read_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_be_bytes(buf[off..off + 2].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_code_raw_round_trip() {
        for raw in [2, 3, 5, 7, 8, 0, -1, 42] {
            assert_eq!(OpCode::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn test_op_code_unknown_maps_to_other() {
        assert_eq!(OpCode::from_raw(99), OpCode::Other(99));
    }

    #[test]
    fn test_encode_header_layout() {
        let enc = FrameEncoder::new();
        let bytes = enc.encode(OpCode::Auth, 1, b"hi");

        assert_eq!(bytes.len(), 18);
        // total_len = 16 + 2, big-endian
        assert_eq!(&bytes[0..4], &[0, 0, 0, 18]);
        // header_len = 16
        assert_eq!(&bytes[4..6], &[0, 16]);
        // version = 1
        assert_eq!(&bytes[6..8], &[0, 1]);
        // op = 7
        assert_eq!(&bytes[8..12], &[0, 0, 0, 7]);
        // seq starts at 1
        assert_eq!(&bytes[12..16], &[0, 0, 0, 1]);
        assert_eq!(&bytes[16..], b"hi");
    }

    #[test]
    fn test_encode_sequence_increments_per_call() {
        let enc = FrameEncoder::new();
        let first = enc.encode(OpCode::Heartbeat, 1, b"");
        let second = enc.encode(OpCode::Heartbeat, 1, b"");
        assert_eq!(&first[12..16], &[0, 0, 0, 1]);
        assert_eq!(&second[12..16], &[0, 0, 0, 2]);
    }

    #[test]
    fn test_encode_sequence_wraps_without_panicking() {
        let enc = FrameEncoder {
            seq: AtomicU32::new(u32::MAX),
        };
        let last = enc.encode(OpCode::Heartbeat, 1, b"");
        assert_eq!(&last[12..16], &[0xFF, 0xFF, 0xFF, 0xFF]);
        let wrapped = enc.encode(OpCode::Heartbeat, 1, b"");
        assert_eq!(&wrapped[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_encoded_frame_round_trips() {
        let enc = FrameEncoder::new();
        let bytes = enc.encode(OpCode::Message, 0, b"payload");

        let frames = decode_all(&bytes);
        assert_eq!(
            frames,
            vec![Frame {
                version: 0,
                op: OpCode::Message,
                body: b"payload".to_vec(),
            }]
        );
    }

    #[test]
    fn test_decode_short_buffers_yield_nothing() {
        // Anything under one header's worth of bytes can't hold a frame.
        for len in 0..HEADER_LEN {
            assert!(decode_all(&vec![0xAB; len]).is_empty(), "len={len}");
        }
    }

    #[test]
    fn test_decode_two_concatenated_frames_in_order() {
        let enc = FrameEncoder::new();
        let mut buf = enc.encode(OpCode::Message, 0, b"first");
        buf.extend_from_slice(&enc.encode(OpCode::Message, 2, b"second"));

        let frames = decode_all(&buf);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].body, b"first");
        assert_eq!(frames[1].body, b"second");
        assert_eq!(frames[1].version, 2);
    }

    #[test]
    fn test_decode_stops_at_truncated_tail() {
        let enc = FrameEncoder::new();
        let mut buf = enc.encode(OpCode::Message, 0, b"whole");
        let tail = enc.encode(OpCode::Message, 0, b"cut off");
        // Append all but the last byte of the second frame.
        buf.extend_from_slice(&tail[..tail.len() - 1]);

        let frames = decode_all(&buf);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].body, b"whole");
    }

    #[test]
    fn test_decode_stops_when_declared_length_exceeds_buffer() {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&1_000u32.to_be_bytes());
        buf[4..6].copy_from_slice(&16u16.to_be_bytes());
        assert!(decode_all(&buf).is_empty());
    }

    #[test]
    fn test_decode_stops_at_zero_total_length() {
        let enc = FrameEncoder::new();
        let mut buf = enc.encode(OpCode::Message, 0, b"ok");
        // A zeroed header would otherwise loop forever at the same offset.
        buf.extend_from_slice(&[0u8; HEADER_LEN]);

        let frames = decode_all(&buf);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_decode_header_longer_than_total_yields_empty_body() {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&(HEADER_LEN as u32).to_be_bytes());
        buf[4..6].copy_from_slice(&64u16.to_be_bytes()); // header_len > total
        buf[8..12].copy_from_slice(&5i32.to_be_bytes());

        let frames = decode_all(&buf);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].body.is_empty());
        assert_eq!(frames[0].op, OpCode::Message);
    }
}

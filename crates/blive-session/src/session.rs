//! The live-room connection session.
//!
//! One [`LiveSession`] owns one connection attempt end to end: endpoint
//! lookup, WebSocket open, auth handshake, keep-alive heartbeat, and the
//! inbound decode loop that turns wire bytes into [`LiveHandler`]
//! callbacks. Sessions are single-use: after [`close`](LiveSession::close)
//! the owner builds a new one for the next attempt; reconnect policy
//! deliberately lives with the owner.
//!
//! # Task model
//!
//! `connect()` spawns two background tasks:
//!
//! - the **heartbeat** task ticks on a fixed period (first tick
//!   immediate) and sends a minimal heartbeat frame;
//! - the **reader** task sits in `recv()` and dispatches every inbound
//!   binary message synchronously.
//!
//! Both address the socket through one shared slot
//! (`Mutex<Option<Connection>>`, locked only long enough to clone the
//! handle out). `close()` aborts both tasks and empties the slot, so an
//! in-flight heartbeat tick that raced the close finds no socket and
//! becomes a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use blive_protocol::{
    decode_all, decode_payload, extract_event, FrameEncoder, LiveEvent, OpCode,
};
use blive_transport::{Connection, Connector};

use crate::{InfoSource, LiveHandler, SessionConfig, SessionError};

/// Body of every outbound heartbeat frame. The broker only checks that
/// *something* arrives; this exact string is what the web client sends.
const HEARTBEAT_BODY: &[u8] = b"[object Object]";

/// Hard cap on compressed-container nesting. One level is the only shape
/// observed in the wild; the cap keeps a malicious frame from recursing.
const MAX_NESTING: usize = 4;

/// Lifecycle of one session.
///
/// ```text
/// Disconnected → Connecting → Authenticating → Live → Closing → Disconnected
/// ```
///
/// `Live` is entered on the auth acknowledgment. Heartbeats start earlier,
/// right after the auth frame is sent; the broker tolerates that, and a
/// late or missing ack must not stall the keep-alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection. Both the initial and the terminal state.
    Disconnected,
    /// Endpoint lookup and socket open in progress.
    Connecting,
    /// Socket open, auth frame sent, ack not yet seen.
    Authenticating,
    /// Auth acknowledged; the event feed is flowing.
    Live,
    /// `close()` is tearing the session down.
    Closing,
}

/// Auth handshake body, serialized to JSON as the first frame's payload.
#[derive(Serialize)]
struct AuthBody<'a> {
    uid: u64,
    roomid: u64,
    /// Asks the broker for zlib-packed containers.
    protover: u16,
    platform: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    key: &'a str,
}

/// State shared between the session handle and its background tasks.
struct Shared<C> {
    handler: Arc<dyn LiveHandler>,
    encoder: FrameEncoder,
    conn: Mutex<Option<C>>,
    state: Mutex<SessionState>,
}

impl<C: Connection> Shared<C> {
    fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap() = state;
    }

    fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Clones the current socket handle out of the slot, holding the lock
    /// only for the copy.
    fn current_conn(&self) -> Option<C> {
        self.conn.lock().unwrap().clone()
    }

    /// Encodes and sends one frame, if a socket is present.
    ///
    /// Fire-and-forget: a cleared slot makes this a no-op, and a send
    /// error is logged because the reader task will surface the broken
    /// connection to the owner on its side.
    async fn send_frame(&self, op: OpCode, version: u16, body: &[u8]) {
        let Some(conn) = self.current_conn() else {
            return;
        };
        let frame = self.encoder.encode(op, version, body);
        if let Err(e) = conn.send(&frame).await {
            debug!(error = %e, op = op.raw(), "frame send failed");
        }
    }

    /// Decodes one inbound binary message and dispatches its frames.
    ///
    /// Compressed message bodies hold nested frames and re-enter here one
    /// level deeper. Every fallible step either defaults or skips, so a
    /// malformed message can never tear the connection down.
    fn dispatch(&self, bytes: &[u8], depth: usize) {
        if depth >= MAX_NESTING {
            warn!(depth, "frame nesting too deep, dropping container");
            return;
        }

        for frame in decode_all(bytes) {
            match frame.op {
                OpCode::Message => {
                    let payload = match decode_payload(frame.version, &frame.body) {
                        Ok(payload) => payload,
                        Err(e) => {
                            debug!(
                                error = %e,
                                version = frame.version,
                                "message payload undecodable, frame skipped"
                            );
                            continue;
                        }
                    };
                    if frame.version == 2 || frame.version == 3 {
                        self.dispatch(&payload, depth + 1);
                    } else if let Some(event) = extract_event(&payload) {
                        match event {
                            LiveEvent::Danmaku(e) => self.handler.on_danmaku(&e),
                            LiveEvent::SuperChat(e) => self.handler.on_super_chat(&e),
                        }
                    }
                }
                OpCode::AuthAck => {
                    self.set_state(SessionState::Live);
                    self.handler.on_status("danmaku authenticated");
                }
                // Heartbeat acks and unknown ops carry nothing we surface.
                _ => {}
            }
        }
    }
}

/// A single live-room connection.
///
/// Generic over the lookup seam and the transport so tests can drive it
/// entirely in memory. See the module docs for the task model.
pub struct LiveSession<S, C: Connector> {
    room_id: u64,
    info_source: S,
    connector: C,
    config: SessionConfig,
    started: AtomicBool,
    closing: AtomicBool,
    shared: Arc<Shared<C::Connection>>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl<S, C> LiveSession<S, C>
where
    S: InfoSource,
    C: Connector,
{
    /// Creates a session for `room_id`. Nothing happens until `connect()`.
    pub fn new(
        room_id: u64,
        info_source: S,
        connector: C,
        handler: Arc<dyn LiveHandler>,
        config: SessionConfig,
    ) -> Self {
        Self {
            room_id,
            info_source,
            connector,
            config,
            started: AtomicBool::new(false),
            closing: AtomicBool::new(false),
            shared: Arc::new(Shared {
                handler,
                encoder: FrameEncoder::new(),
                conn: Mutex::new(None),
                state: Mutex::new(SessionState::Disconnected),
            }),
            heartbeat: Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    /// The room this session is (or was) connected to.
    pub fn room_id(&self) -> u64 {
        self.room_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Looks up the endpoint, opens the socket, sends the auth frame, and
    /// starts the heartbeat and reader tasks.
    ///
    /// Operational problems (a failed lookup, an empty host list, a blank
    /// token, a refused socket) are *reported* through the status
    /// callback and leave the session `Disconnected` with `Ok(())`: they
    /// are transient upstream conditions the owner may retry with a fresh
    /// session. `Err` is reserved for misuse (calling `connect()` twice).
    pub async fn connect(&self) -> Result<(), SessionError> {
        // Single-use: even a failed attempt consumes the session.
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyStarted);
        }
        self.shared.set_state(SessionState::Connecting);

        let info = match self.info_source.lookup(self.room_id).await {
            Ok(info) => info,
            Err(e) => {
                self.shared
                    .handler
                    .on_status(&format!("danmaku info lookup failed: {e}"));
                self.shared.set_state(SessionState::Disconnected);
                return Ok(());
            }
        };

        let host = info.hosts.first();
        let (host, token) = match host {
            Some(host) if !info.token.trim().is_empty() => (host, info.token.as_str()),
            _ => {
                self.shared.handler.on_status("danmaku connect info empty");
                self.shared.set_state(SessionState::Disconnected);
                return Ok(());
            }
        };

        let url = format!("wss://{}:{}/sub", host.host, host.wss_port);
        self.shared
            .handler
            .on_status(&format!("connecting danmaku: {}:{}", host.host, host.wss_port));

        let headers = [
            ("User-Agent".to_string(), self.config.user_agent.clone()),
            ("Referer".to_string(), self.config.referer.clone()),
        ];
        let conn = match self.connector.connect(&url, &headers).await {
            Ok(conn) => conn,
            Err(e) => {
                self.shared
                    .handler
                    .on_status(&format!("danmaku connect failed: {e}"));
                self.shared.set_state(SessionState::Disconnected);
                return Ok(());
            }
        };

        self.shared.handler.on_status("danmaku connected");
        {
            // A close() that raced this connect must win: never store a
            // socket into a session that is already shutting down.
            let mut slot = self.shared.conn.lock().unwrap();
            if self.closing.load(Ordering::SeqCst) {
                drop(slot);
                if let Err(e) = conn.close().await {
                    debug!(error = %e, "socket close failed");
                }
                self.shared.set_state(SessionState::Disconnected);
                return Ok(());
            }
            *slot = Some(conn);
        }

        let auth = AuthBody {
            uid: 0,
            roomid: self.room_id,
            protover: 2,
            platform: "web",
            kind: 2,
            key: token,
        };
        let body = serde_json::to_vec(&auth)?;
        self.shared.send_frame(OpCode::Auth, 1, &body).await;
        self.shared.set_state(SessionState::Authenticating);

        self.arm_heartbeat();
        self.spawn_reader();
        // close() may also land between storing the socket and arming the
        // tasks; run the teardown again so nothing outlives it.
        if self.closing.load(Ordering::SeqCst) {
            self.close().await;
        }
        Ok(())
    }

    /// (Re-)arms the keep-alive: cancels any previous timer, then ticks on
    /// a fixed period with the first tick immediate.
    fn arm_heartbeat(&self) {
        let mut slot = self.heartbeat.lock().unwrap();
        if let Some(prev) = slot.take() {
            prev.abort();
        }

        let shared = Arc::clone(&self.shared);
        let period = self.config.heartbeat_period;
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                shared.send_frame(OpCode::Heartbeat, 1, HEARTBEAT_BODY).await;
            }
        }));
    }

    /// Spawns the inbound loop: every binary message goes through frame
    /// decoding, per-version payload decoding, and event extraction.
    fn spawn_reader(&self) {
        let shared = Arc::clone(&self.shared);
        let mut slot = self.reader.lock().unwrap();
        *slot = Some(tokio::spawn(async move {
            let Some(conn) = shared.current_conn() else {
                return;
            };
            loop {
                match conn.recv().await {
                    Ok(Some(bytes)) => shared.dispatch(&bytes, 0),
                    Ok(None) => {
                        shared.handler.on_status("danmaku disconnected by peer");
                        shared.set_state(SessionState::Disconnected);
                        break;
                    }
                    Err(e) => {
                        shared
                            .handler
                            .on_status(&format!("danmaku connection failed: {e}"));
                        shared.set_state(SessionState::Disconnected);
                        break;
                    }
                }
            }
        }));
    }

    /// Tears the session down: cancels the heartbeat, closes the socket
    /// with a normal closure, and stops the reader.
    ///
    /// Safe to call repeatedly, safe to call on a session that never
    /// connected, and safe to call while `connect()` is still running: a
    /// socket that `connect()` opens after the close began is shut down
    /// again before anything is sent on it.
    ///
    /// Once `close()` returns, no further heartbeat is sent: the timer
    /// task is aborted and the socket slot is empty, so a tick that was
    /// already queued finds nothing to send on.
    pub async fn close(&self) {
        self.closing.store(true, Ordering::SeqCst);
        self.shared.set_state(SessionState::Closing);

        if let Some(heartbeat) = self.heartbeat.lock().unwrap().take() {
            heartbeat.abort();
        }

        let conn = self.shared.conn.lock().unwrap().take();
        if let Some(conn) = conn {
            if let Err(e) = conn.close().await {
                debug!(error = %e, "socket close failed");
            }
        }

        if let Some(reader) = self.reader.lock().unwrap().take() {
            reader.abort();
        }

        self.shared.set_state(SessionState::Disconnected);
    }
}

impl<S, C: Connector> Drop for LiveSession<S, C> {
    fn drop(&mut self) {
        // Dropping without close() must not leave timer callbacks running.
        if let Some(heartbeat) = self.heartbeat.lock().unwrap().take() {
            heartbeat.abort();
        }
        if let Some(reader) = self.reader.lock().unwrap().take() {
            reader.abort();
        }
    }
}

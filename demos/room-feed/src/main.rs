//! Terminal live-chat feed.
//!
//! Connects a [`LiveSession`] to a room and prints every chat and
//! super-chat message until Ctrl-C. Credential lookup is out of the
//! client's scope, so the endpoint and token come from the command line
//! (fetch them from your room-info API of choice):
//!
//! ```text
//! room-feed <room_id> <host> <wss_port> <token>
//! ```
//!
//! Set `RUST_LOG=blive_session=debug` to watch the decode path.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use blive::{
    ConnectInfo, DanmakuEvent, DanmuHost, InfoSource, LiveHandler, LiveSession,
    SessionConfig, SessionError, SuperChatEvent, WsConnector,
};

/// Lookup seam backed by command-line arguments.
struct ArgInfo {
    host: String,
    wss_port: u16,
    token: String,
}

impl InfoSource for ArgInfo {
    async fn lookup(&self, _room_id: u64) -> Result<ConnectInfo, SessionError> {
        Ok(ConnectInfo {
            hosts: vec![DanmuHost {
                host: self.host.clone(),
                wss_port: self.wss_port,
            }],
            token: self.token.clone(),
        })
    }
}

/// Prints events as they arrive; statuses go to stderr.
struct TerminalFeed;

impl LiveHandler for TerminalFeed {
    fn on_danmaku(&self, event: &DanmakuEvent) {
        println!("\x1b[38;2;{};{};{}m{}\x1b[0m", (event.color >> 16) & 0xFF,
            (event.color >> 8) & 0xFF, event.color & 0xFF, event.text);
    }

    fn on_super_chat(&self, event: &SuperChatEvent) {
        println!("★ [{}] {}: {}", event.price, event.user, event.message);
    }

    fn on_status(&self, status: &str) {
        eprintln!("* {status}");
    }
}

fn usage() -> ! {
    eprintln!("usage: room-feed <room_id> <host> <wss_port> <token>");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(room_id), Some(host), Some(wss_port), Some(token)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        usage()
    };
    let Ok(room_id) = room_id.parse::<u64>() else { usage() };
    let Ok(wss_port) = wss_port.parse::<u16>() else { usage() };

    let session = LiveSession::new(
        room_id,
        ArgInfo {
            host,
            wss_port,
            token,
        },
        WsConnector,
        Arc::new(TerminalFeed),
        SessionConfig::default(),
    );

    if let Err(e) = session.connect().await {
        tracing::error!(error = %e, "connect failed");
        return;
    }

    tokio::signal::ctrl_c().await.ok();
    session.close().await;
}

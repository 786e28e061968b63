//! Socket Server Module
//!
//! Raw request/response protocol over persistent TCP connections. Each
//! framed message is colon-delimited into `COMMAND:ARG1:ARG2`; one handler
//! task per connection, with the engine providing all thread-safety.

use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheKey, PutOutcome};
use crate::engine::{CacheEngine, KeyStatus};
use crate::net::frame::{read_frame, write_frame};

// == Protocol Tokens ==
const OK: &str = "OK";
const PONG: &str = "PONG";
const MISS: &str = "MISS";
const ERR_UNKNOWN: &str = "ERR_UNKNOWN";
const ERR_REJECTED: &str = "ERR_REJECTED";

// == Spawn ==
/// Binds the socket transport and serves connections in a background task.
///
/// Returns a JoinHandle which can be used to abort the transport during
/// graceful shutdown.
pub fn spawn_socket_server(engine: Arc<CacheEngine>, port: u16) -> JoinHandle<()> {
    tokio::spawn(async move {
        match TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                info!("Socket transport listening on port {}", port);
                serve(listener, engine).await;
            }
            Err(e) => {
                error!("Failed to bind socket transport on port {}: {}", port, e);
            }
        }
    })
}

// == Serve ==
/// Accept loop: one handler task per connection.
pub async fn serve(listener: TcpListener, engine: Arc<CacheEngine>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("Socket client connected: {}", peer);
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, engine).await {
                        debug!("Socket client {} disconnected: {}", peer, e);
                    }
                });
            }
            Err(e) => {
                warn!("Socket accept failed: {}", e);
            }
        }
    }
}

// == Connection Handler ==
/// Reads framed requests until the client disconnects, answering each with a
/// framed response.
async fn handle_connection(mut stream: TcpStream, engine: Arc<CacheEngine>) -> std::io::Result<()> {
    while let Some(request) = read_frame(&mut stream).await? {
        let response = dispatch(&engine, &request);
        write_frame(&mut stream, &response).await?;
    }
    Ok(())
}

// == Dispatch ==
/// Parses one colon-delimited command and runs it against the engine.
///
/// Values may contain colons, so the message splits into at most three
/// parts. Unrecognized or malformed commands answer `ERR_UNKNOWN`.
fn dispatch(engine: &CacheEngine, request: &str) -> String {
    let mut parts = request.splitn(3, ':');
    let command = parts.next().unwrap_or_default().to_ascii_uppercase();
    let arg1 = parts.next();
    let arg2 = parts.next();

    match command.as_str() {
        "VERSION" => OK.to_string(),
        "PING" => PONG.to_string(),
        "CHECK" => match parse_key(arg1) {
            Some(key) => match engine.get(&key) {
                Some(entry) => format!("HIT:{}", entry.value),
                None => MISS.to_string(),
            },
            None => ERR_UNKNOWN.to_string(),
        },
        "SET" | "ENQUEUE" => match (parse_key(arg1), arg2) {
            (Some(key), Some(value)) => match engine.put(&key, value.to_string(), None) {
                PutOutcome::Stored => OK.to_string(),
                PutOutcome::Rejected => ERR_REJECTED.to_string(),
            },
            _ => ERR_UNKNOWN.to_string(),
        },
        "STATUS" => match parse_key(arg1) {
            Some(key) => match engine.key_status(&key) {
                KeyStatus::Done => "DONE".to_string(),
                KeyStatus::Queued => "QUEUED".to_string(),
                KeyStatus::New => "NEW".to_string(),
            },
            None => ERR_UNKNOWN.to_string(),
        },
        _ => ERR_UNKNOWN.to_string(),
    }
}

/// Parses a raw composite key argument, treating malformed keys as absent.
fn parse_key(arg: Option<&str>) -> Option<CacheKey> {
    CacheKey::parse(arg?).ok()
}

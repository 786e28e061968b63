//! Integration Tests for the Socket Transport
//!
//! Drives a spawned listener over real TCP connections, exercising the
//! length-prefix framing and every command token.

use std::sync::Arc;

use embercache::engine::CacheEngine;
use embercache::net::{read_frame, serve, write_frame};
use tokio::net::{TcpListener, TcpStream};

// == Helper Functions ==

/// Binds an ephemeral listener, serves it in the background, and returns a
/// connected client stream plus the engine for direct inspection.
async fn connect() -> (TcpStream, Arc<CacheEngine>) {
    let engine = Arc::new(CacheEngine::new(100, 64, false, false));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(listener, Arc::clone(&engine)));

    let stream = TcpStream::connect(addr).await.unwrap();
    (stream, engine)
}

/// Sends one framed command and reads the framed response.
async fn roundtrip(stream: &mut TcpStream, command: &str) -> String {
    write_frame(stream, command).await.unwrap();
    read_frame(stream).await.unwrap().expect("server closed connection")
}

// == Command Tests ==

#[tokio::test]
async fn test_version_handshake() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "VERSION:1.0").await, "OK");
}

#[tokio::test]
async fn test_ping_pong() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "PING").await, "PONG");
}

#[tokio::test]
async fn test_set_then_check_hit() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "SET:abc123:hello").await, "OK");
    assert_eq!(roundtrip(&mut stream, "CHECK:abc123").await, "HIT:hello");
}

#[tokio::test]
async fn test_check_miss() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "CHECK:absent").await, "MISS");
}

#[tokio::test]
async fn test_enqueue_stores_value() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "ENQUEUE:abc123:payload").await, "OK");
    assert_eq!(roundtrip(&mut stream, "CHECK:abc123").await, "HIT:payload");
}

#[tokio::test]
async fn test_value_may_contain_colons() {
    let (mut stream, _engine) = connect().await;

    // The message splits into at most three parts, so the value keeps its colons
    assert_eq!(roundtrip(&mut stream, "SET:abc:0.1:0.2:0.3").await, "OK");
    assert_eq!(roundtrip(&mut stream, "CHECK:abc").await, "HIT:0.1:0.2:0.3");
}

#[tokio::test]
async fn test_unknown_command() {
    let (mut stream, _engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "FLUSH:abc").await, "ERR_UNKNOWN");
}

#[tokio::test]
async fn test_oversized_value_rejected() {
    let (mut stream, _engine) = connect().await;

    let command = format!("SET:abc:{}", "x".repeat(65));
    assert_eq!(roundtrip(&mut stream, &command).await, "ERR_REJECTED");
    assert_eq!(roundtrip(&mut stream, "CHECK:abc").await, "MISS");
}

#[tokio::test]
async fn test_status_reports_lifecycle() {
    let (mut stream, engine) = connect().await;

    assert_eq!(roundtrip(&mut stream, "STATUS:abc").await, "NEW");

    let key = embercache::cache::CacheKey::new("abc", None).unwrap();
    engine.submit_task(key.clone(), None);
    assert_eq!(roundtrip(&mut stream, "STATUS:abc").await, "QUEUED");

    engine.lease_tasks(10, None);
    assert_eq!(roundtrip(&mut stream, "STATUS:abc").await, "QUEUED");

    engine.resolve_task(&key);
    engine.put(&key, "vector".to_string(), None);
    assert_eq!(roundtrip(&mut stream, "STATUS:abc").await, "DONE");
}

// == Connection Behavior Tests ==

#[tokio::test]
async fn test_many_commands_on_one_connection() {
    let (mut stream, _engine) = connect().await;

    for i in 0..50 {
        let set = format!("SET:key{}:value{}", i, i);
        assert_eq!(roundtrip(&mut stream, &set).await, "OK");
    }
    for i in 0..50 {
        let check = format!("CHECK:key{}", i);
        assert_eq!(roundtrip(&mut stream, &check).await, format!("HIT:value{}", i));
    }
}

#[tokio::test]
async fn test_concurrent_connections_share_engine() {
    let engine = Arc::new(CacheEngine::new(100, 64, false, false));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::clone(&engine)));

    let mut writer = TcpStream::connect(addr).await.unwrap();
    let mut reader = TcpStream::connect(addr).await.unwrap();

    assert_eq!(roundtrip(&mut writer, "SET:shared:value").await, "OK");
    assert_eq!(roundtrip(&mut reader, "CHECK:shared").await, "HIT:value");
}

#[tokio::test]
async fn test_disconnect_leaves_server_running() {
    let engine = Arc::new(CacheEngine::new(100, 64, false, false));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::clone(&engine)));

    {
        let mut first = TcpStream::connect(addr).await.unwrap();
        assert_eq!(roundtrip(&mut first, "SET:abc:v").await, "OK");
        // Dropped here: clean disconnect
    }

    let mut second = TcpStream::connect(addr).await.unwrap();
    assert_eq!(roundtrip(&mut second, "CHECK:abc").await, "HIT:v");
}

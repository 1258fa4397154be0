//! Bridge liveness probe tests against a scripted local endpoint
//!
//! Each test binds an ephemeral listener and serves one canned HTTP response,
//! pinning the distinct probe outcomes without touching the network.

use std::time::Duration;

use secrecy::SecretString;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use friday_agent::bridge::probe::{probe, ProbeOutcome};

const SSE_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
content-type: text/event-stream\r\n\
connection: close\r\n\
\r\n\
data: event one\n\n\
data: event two\n\n\
data: event three\n\n";

const NOT_FOUND_RESPONSE: &str = "HTTP/1.1 404 Not Found\r\n\
content-length: 0\r\n\
connection: close\r\n\
\r\n";

fn token() -> SecretString {
    SecretString::from("secret".to_string())
}

/// Serve one connection with a fixed response, returning the probe URL
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}/sse")
}

#[tokio::test]
async fn live_stream_counts_event_lines() {
    let url = serve_once(SSE_RESPONSE).await;

    let outcome = probe(&url, &token(), Duration::from_secs(5)).await;

    assert_eq!(outcome, ProbeOutcome::Success { lines_received: 3 });
}

#[tokio::test]
async fn non_success_status_is_reported_as_status() {
    let url = serve_once(NOT_FOUND_RESPONSE).await;

    let outcome = probe(&url, &token(), Duration::from_secs(5)).await;

    assert_eq!(outcome, ProbeOutcome::Status(404));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            // Hold the connection open without ever answering
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        }
    });

    let url = format!("http://{addr}/sse");
    let outcome = probe(&url, &token(), Duration::from_millis(200)).await;

    assert_eq!(outcome, ProbeOutcome::Timeout);
}

#[tokio::test]
async fn refused_connection_is_reported_as_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let url = format!("http://{addr}/sse");
    let outcome = probe(&url, &token(), Duration::from_secs(2)).await;

    assert!(matches!(outcome, ProbeOutcome::Failed(_)), "got {outcome:?}");
}

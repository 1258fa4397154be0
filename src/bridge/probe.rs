//! Standalone liveness probe for the bridge endpoint
//!
//! Used by the health check: performs the same authenticated GET as the
//! connector, asserts status 200, and reads the first few non-empty lines of
//! the event stream to confirm the server is actually feeding events.

use std::time::Duration;

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};

/// Number of non-empty stream lines that counts as a live feed
const LINES_WANTED: usize = 3;

/// Outcome of one liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Endpoint answered 200 and produced stream data
    Success {
        /// Non-empty lines read before stopping
        lines_received: usize,
    },
    /// Endpoint answered with a non-200 status
    Status(u16),
    /// No answer within the probe timeout
    Timeout,
    /// Request failed below the HTTP layer (DNS, refused connection, TLS)
    Failed(String),
}

/// Probe the bridge endpoint.
///
/// Timeouts are a normal outcome (`ProbeOutcome::Timeout`), not an error; this
/// function never panics and never returns `Err`.
pub async fn probe(url: &str, token: &SecretString, timeout: Duration) -> ProbeOutcome {
    let client = match reqwest::Client::builder().connect_timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => return ProbeOutcome::Failed(format!("http client: {e}")),
    };

    let attempt = async {
        tracing::info!(url, "testing bridge connection");

        let response = match client
            .get(url)
            .bearer_auth(token.expose_secret())
            .header("Accept", "text/event-stream")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ProbeOutcome::Failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::Status(status.as_u16());
        }

        ProbeOutcome::Success {
            lines_received: read_stream_lines(response, LINES_WANTED).await,
        }
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(outcome) => outcome,
        Err(_) => ProbeOutcome::Timeout,
    }
}

/// Read the body stream until `wanted` non-empty lines have been seen or the
/// stream ends, returning the count.
async fn read_stream_lines(response: reqwest::Response, wanted: usize) -> usize {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut lines_read = 0;

    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = buffer.find('\n') {
            let line: String = buffer.drain(..=newline).collect();
            let line = line.trim();
            if !line.is_empty() {
                let preview: String = line.chars().take(100).collect();
                tracing::info!(line = %preview, "bridge stream line");
                lines_read += 1;
                if lines_read >= wanted {
                    return lines_read;
                }
            }
        }
    }

    lines_read
}

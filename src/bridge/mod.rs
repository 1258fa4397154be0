//! Smart-home bridge connector
//!
//! The bridge is the remote tool-provider endpoint that gives the assistant
//! access to smart-home control and state. Connection establishment is retried
//! a bounded number of times; the result is unambiguously a handle or nothing.

pub mod probe;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Opaque handle to an established bridge connection.
///
/// Immutable once created; owned by the session orchestrator for the lifetime
/// of one session. The endpoint and token are forwarded to the realtime engine
/// so it can attach the bridge's tools.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    url: String,
    token: SecretString,
}

impl BridgeHandle {
    /// Wrap an established connection's endpoint and credentials.
    ///
    /// Called by `BridgeTransport` implementations once an attempt succeeds.
    #[must_use]
    pub fn new(url: String, token: SecretString) -> Self {
        Self { url, token }
    }

    /// Bridge endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bearer token for the bridge
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

/// One bridge connection attempt.
///
/// Each call constructs a fresh handle; failed handles are discarded, never
/// reused across attempts.
#[async_trait]
pub trait BridgeTransport: Send + Sync {
    /// Open a connection to the bridge endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable, the token is
    /// rejected, or the server answers with a non-200 status.
    async fn open(&self, url: &str, token: &SecretString) -> Result<BridgeHandle>;
}

/// Production transport: HTTP GET against the bridge's SSE endpoint with a
/// bearer `Authorization` header.
pub struct SseTransport {
    client: reqwest::Client,
}

impl SseTransport {
    /// Create a transport with a per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BridgeTransport for SseTransport {
    async fn open(&self, url: &str, token: &SecretString) -> Result<BridgeHandle> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Bridge(format!(
                "bridge endpoint returned status {status}"
            )));
        }

        Ok(BridgeHandle::new(url.to_string(), token.clone()))
    }
}

/// Retry and warm-up schedule for bridge connection establishment
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Connection attempts before giving up
    pub max_attempts: u32,
    /// Warm-up pause after a successful first attempt
    pub warmup_initial: Duration,
    /// Warm-up pause after a successful later attempt
    pub warmup_retry: Duration,
    /// Base delay for the progressive retry schedule
    pub retry_base: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            warmup_initial: Duration::from_secs(5),
            warmup_retry: Duration::from_secs(3),
            retry_base: Duration::from_secs(3),
        }
    }
}

/// Delay before the next try after failed attempt `attempt` (1-indexed).
///
/// Follows a progressive schedule: `retry_base * attempt` (3s, 6s, 9s with
/// defaults). Distinct from the one-time warm-up pause applied after a
/// successful construction.
#[must_use]
pub fn retry_delay(settings: &BridgeSettings, attempt: u32) -> Duration {
    settings.retry_base.saturating_mul(attempt)
}

/// Establish the bridge connection, retrying up to `settings.max_attempts`.
///
/// Returns `Some(handle)` on success, `None` when the configuration is
/// incomplete or every attempt failed. Missing URL or token is detected before
/// any network attempt. This function never panics and never propagates an
/// error: the caller observes present vs. absent, nothing else.
pub async fn connect(
    transport: &dyn BridgeTransport,
    url: Option<&str>,
    token: Option<&SecretString>,
    settings: &BridgeSettings,
) -> Option<BridgeHandle> {
    let (Some(url), Some(token)) = (url, token) else {
        tracing::error!(
            "bridge environment variables not found (HOME_ASSISTANT_MCP_URL, HOME_ASSISTANT_TOKEN)"
        );
        return None;
    };

    if url.is_empty() || token.expose_secret().is_empty() {
        tracing::error!("bridge URL or token is empty; refusing to attempt connection");
        return None;
    }

    for attempt in 1..=settings.max_attempts {
        tracing::info!(
            attempt,
            max_attempts = settings.max_attempts,
            url,
            "connecting to smart-home bridge"
        );

        match transport.open(url, token).await {
            Ok(handle) => {
                // Let the remote service finish initializing before first use
                let warmup = if attempt == 1 {
                    settings.warmup_initial
                } else {
                    settings.warmup_retry
                };
                tracing::info!(warmup_secs = warmup.as_secs(), "bridge connected, warming up");
                tokio::time::sleep(warmup).await;

                return Some(handle);
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "bridge connection attempt failed");

                if attempt < settings.max_attempts {
                    let delay = retry_delay(settings, attempt);
                    tracing::info!(delay_secs = delay.as_secs(), "waiting before retry");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    tracing::error!(
        attempts = settings.max_attempts,
        "failed to connect to smart-home bridge after all attempts"
    );
    None
}

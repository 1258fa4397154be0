//! Standalone health check
//!
//! Reports environment completeness, bridge reachability and (optionally)
//! smart-home REST reachability as a human-readable report. The REST check is
//! informational; only environment and bridge failures are critical.

use std::fmt::Write as _;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::bridge::probe::{self, ProbeOutcome};
use crate::config::Config;

const REST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Success,
    /// Check could not run but is not critical
    Warning,
    /// Check failed
    Error,
}

impl CheckStatus {
    const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Result of a single health check
#[derive(Debug)]
pub struct CheckResult {
    /// Check name, e.g. "bridge connection"
    pub name: &'static str,
    /// Outcome
    pub status: CheckStatus,
    /// One-line summary
    pub message: String,
    /// Key/value detail rows
    pub details: Vec<(String, String)>,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    fn detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.push((key.to_string(), value.into()));
        self
    }
}

/// Complete health report
#[derive(Debug)]
pub struct HealthReport {
    /// Individual check results, in execution order
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    /// Whether every critical check passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Error)
    }

    /// Render the report as the printable banner format
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "FRIDAY AGENT - HEALTH CHECK RESULTS");
        let _ = writeln!(out, "{rule}");

        let overall = if self.passed() { "SUCCESS" } else { "ERROR" };
        let _ = writeln!(out, "\nOverall Status: {overall}");

        for check in &self.checks {
            let _ = writeln!(out, "\n{}:", check.name.to_uppercase());
            let _ = writeln!(out, "  Status: {}", check.status.label());
            let _ = writeln!(out, "  Message: {}", check.message);
            if !check.details.is_empty() {
                let _ = writeln!(out, "  Details:");
                for (key, value) in &check.details {
                    let _ = writeln!(out, "    {key}: {value}");
                }
            }
        }

        let _ = writeln!(out, "\n{rule}");
        out
    }
}

/// Run every check against the loaded configuration
pub async fn run(config: &Config) -> HealthReport {
    tracing::info!("starting health check");

    HealthReport {
        checks: vec![
            check_environment(config),
            check_bridge(config).await,
            check_rest_api(config).await,
        ],
    }
}

/// Verify the required bridge environment variables are present
fn check_environment(config: &Config) -> CheckResult {
    let mut missing = Vec::new();
    if config.bridge.url.is_none() {
        missing.push("HOME_ASSISTANT_MCP_URL");
    }
    if config.bridge.token.is_none() {
        missing.push("HOME_ASSISTANT_TOKEN");
    }

    if missing.is_empty() {
        CheckResult::new(
            "environment",
            CheckStatus::Success,
            "All required environment variables are set",
        )
    } else {
        CheckResult::new(
            "environment",
            CheckStatus::Error,
            format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ),
        )
        .detail("missing_vars", missing.join(", "))
    }
}

/// Probe the bridge SSE endpoint
async fn check_bridge(config: &Config) -> CheckResult {
    let (Some(url), Some(token)) = (&config.bridge.url, &config.bridge.token) else {
        return CheckResult::new(
            "bridge connection",
            CheckStatus::Error,
            "Bridge environment variables not configured",
        )
        .detail(
            "HOME_ASSISTANT_MCP_URL",
            if config.bridge.url.is_some() { "set" } else { "not set" },
        )
        .detail(
            "HOME_ASSISTANT_TOKEN",
            if config.bridge.token.is_some() { "set" } else { "not set" },
        );
    };

    let timeout = Duration::from_secs(config.bridge.timeout_secs);
    match probe::probe(url, token, timeout).await {
        ProbeOutcome::Success { lines_received } => CheckResult::new(
            "bridge connection",
            CheckStatus::Success,
            "Bridge connection successful",
        )
        .detail("url", url.clone())
        .detail("lines_received", lines_received.to_string()),
        ProbeOutcome::Status(code) => CheckResult::new(
            "bridge connection",
            CheckStatus::Error,
            format!("Bridge endpoint returned status {code}"),
        )
        .detail("status_code", code.to_string()),
        ProbeOutcome::Timeout => CheckResult::new(
            "bridge connection",
            CheckStatus::Error,
            "Bridge connection timeout",
        )
        .detail("timeout", format!("{} seconds", timeout.as_secs())),
        ProbeOutcome::Failed(message) => CheckResult::new(
            "bridge connection",
            CheckStatus::Error,
            format!("Bridge connection failed: {message}"),
        ),
    }
}

/// Entity row from the smart-home REST API; only the ID matters here
#[derive(Debug, Deserialize)]
struct EntityState {
    entity_id: String,
}

/// Check the smart-home REST API (informational only)
async fn check_rest_api(config: &Config) -> CheckResult {
    let Some(ha) = &config.home_assistant else {
        return CheckResult::new(
            "rest api",
            CheckStatus::Warning,
            "REST API environment variables not configured",
        );
    };

    let url = format!("{}/api/states", ha.url.trim_end_matches('/'));
    tracing::info!(url, "testing REST API connection");

    let client = match reqwest::Client::builder().timeout(REST_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::new(
                "rest api",
                CheckStatus::Error,
                format!("REST API connection failed: {e}"),
            );
        }
    };

    let response = match client
        .get(&url)
        .bearer_auth(ha.token.expose_secret())
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            return CheckResult::new(
                "rest api",
                CheckStatus::Error,
                format!("REST API connection failed: {e}"),
            );
        }
    };

    let status = response.status();
    if !status.is_success() {
        return CheckResult::new(
            "rest api",
            CheckStatus::Error,
            format!("REST API returned status {}", status.as_u16()),
        )
        .detail("status_code", status.as_u16().to_string());
    }

    match response.json::<Vec<EntityState>>().await {
        Ok(entities) => {
            let lights = entities
                .iter()
                .filter(|e| e.entity_id.starts_with("light."))
                .count();

            CheckResult::new(
                "rest api",
                CheckStatus::Success,
                "REST API connection successful",
            )
            .detail("total_entities", entities.len().to_string())
            .detail("lights_found", lights.to_string())
        }
        Err(e) => CheckResult::new(
            "rest api",
            CheckStatus::Error,
            format!("REST API returned an unreadable response: {e}"),
        ),
    }
}

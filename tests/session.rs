//! Orchestrator startup tests with a mock engine session
//!
//! Pin the bridge-first contract: no session call happens when the bridge is
//! absent, and the happy path runs start, connect, reply in order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use friday_agent::bridge::{BridgeHandle, BridgeSettings, BridgeTransport};
use friday_agent::config::{
    AgentConfig, BridgeConfig, Config, EngineConfig, LogFormat, LoggingConfig,
};
use friday_agent::prompts;
use friday_agent::{
    Error, Orchestrator, RealtimeSession, Result, SessionStartOptions, ToolRegistry,
};

/// Transport that always succeeds or always fails
struct FixedTransport {
    succeed: bool,
    attempts: AtomicUsize,
}

#[async_trait]
impl BridgeTransport for FixedTransport {
    async fn open(&self, url: &str, token: &SecretString) -> Result<BridgeHandle> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(BridgeHandle::new(url.to_string(), token.clone()))
        } else {
            Err(Error::Bridge("connection refused".to_string()))
        }
    }
}

/// Session mock recording the call sequence
#[derive(Default)]
struct RecordingSession {
    calls: Vec<String>,
    start_options: Option<SessionStartOptions>,
    last_instructions: Option<String>,
}

#[async_trait]
impl RealtimeSession for RecordingSession {
    async fn start(&mut self, options: &SessionStartOptions) -> Result<()> {
        self.calls.push("start".to_string());
        self.start_options = Some(options.clone());
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        self.calls.push("connect".to_string());
        Ok(())
    }

    async fn generate_reply(&mut self, instructions: &str) -> Result<()> {
        self.calls.push("reply".to_string());
        self.last_instructions = Some(instructions.to_string());
        Ok(())
    }
}

fn instant_settings() -> BridgeSettings {
    BridgeSettings {
        max_attempts: 1,
        warmup_initial: Duration::ZERO,
        warmup_retry: Duration::ZERO,
        retry_base: Duration::ZERO,
    }
}

fn test_config(with_bridge: bool) -> Config {
    Config {
        bridge: BridgeConfig {
            url: with_bridge.then(|| "https://ha.local/mcp_server/sse".to_string()),
            token: with_bridge.then(|| SecretString::from("token".to_string())),
            retry_attempts: 2,
            timeout_secs: 30,
        },
        home_assistant: None,
        agent: AgentConfig {
            name: "Friday".to_string(),
            voice: "default".to_string(),
            temperature: 0.7,
            max_response_length: 1000,
            enable_video: false,
            enable_noise_cancellation: true,
        },
        engine: EngineConfig {
            url: "https://engine.example".to_string(),
            api_key: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Full,
            file_path: None,
        },
    }
}

#[tokio::test]
async fn missing_bridge_config_is_fatal_before_any_session_call() {
    let orchestrator = Orchestrator::new(test_config(false), ToolRegistry::new())
        .with_bridge_settings(instant_settings());
    let transport = FixedTransport {
        succeed: true,
        attempts: AtomicUsize::new(0),
    };
    let mut session = RecordingSession::default();

    let result = orchestrator.run(&transport, &mut session).await;

    assert!(matches!(result, Err(Error::Bridge(_))));
    assert!(session.calls.is_empty());
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_bridge_is_fatal_before_any_session_call() {
    let orchestrator = Orchestrator::new(test_config(true), ToolRegistry::new())
        .with_bridge_settings(instant_settings());
    let transport = FixedTransport {
        succeed: false,
        attempts: AtomicUsize::new(0),
    };
    let mut session = RecordingSession::default();

    let result = orchestrator.run(&transport, &mut session).await;

    assert!(matches!(result, Err(Error::Bridge(_))));
    assert!(session.calls.is_empty());
    // retry_attempts from the config, not the default
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn startup_runs_start_connect_reply_in_order() {
    let mut config = test_config(true);
    config.bridge.retry_attempts = 1;
    let orchestrator = Orchestrator::new(config, ToolRegistry::new())
        .with_bridge_settings(instant_settings());
    let transport = FixedTransport {
        succeed: true,
        attempts: AtomicUsize::new(0),
    };
    let mut session = RecordingSession::default();

    orchestrator
        .run(&transport, &mut session)
        .await
        .expect("startup should succeed");

    assert_eq!(session.calls, ["start", "connect", "reply"]);

    let options = session.start_options.expect("start options recorded");
    assert_eq!(options.instructions, prompts::AGENT_INSTRUCTION);
    assert_eq!(options.voice, "default");
    assert_eq!(options.bridge.url(), "https://ha.local/mcp_server/sse");
}

#[tokio::test]
async fn opening_turn_appends_bridge_troubleshooting_verbatim() {
    let mut config = test_config(true);
    config.bridge.retry_attempts = 1;
    let orchestrator = Orchestrator::new(config, ToolRegistry::new())
        .with_bridge_settings(instant_settings());
    let transport = FixedTransport {
        succeed: true,
        attempts: AtomicUsize::new(0),
    };
    let mut session = RecordingSession::default();

    orchestrator
        .run(&transport, &mut session)
        .await
        .expect("startup should succeed");

    let opening = session.last_instructions.expect("opening turn recorded");
    assert!(opening.starts_with(prompts::SESSION_INSTRUCTION));
    assert!(opening.ends_with(prompts::BRIDGE_TROUBLESHOOTING));
}

// Bridge warm-up delays make the happy path slow with default settings; make
// sure the orchestrator honors the documented defaults rather than skipping
// the warm-up entirely.
#[test]
fn default_bridge_settings_keep_warmup() {
    let settings = BridgeSettings::default();
    assert!(settings.warmup_initial > Duration::ZERO);
    assert!(settings.warmup_retry > Duration::ZERO);
}

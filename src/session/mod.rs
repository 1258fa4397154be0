//! Session orchestration
//!
//! Composes the persona, the tool registry and the bridge connection into one
//! running realtime session. Startup is bridge-first: if the bridge cannot be
//! reached the session never starts. There is no degraded local-tools-only
//! mode; the process-level failure model is crash-and-restart.

pub mod realtime;

use async_trait::async_trait;

use crate::bridge::{self, BridgeHandle, BridgeSettings, BridgeTransport};
use crate::config::Config;
use crate::prompts::{AGENT_INSTRUCTION, BRIDGE_TROUBLESHOOTING, SESSION_INSTRUCTION};
use crate::tools::{ToolDescriptor, ToolRegistry};
use crate::{Error, Result};

pub use realtime::RealtimeClient;

/// Everything the realtime engine needs to start one session
#[derive(Debug, Clone)]
pub struct SessionStartOptions {
    /// Persona/system prompt
    pub instructions: String,
    /// Voice identifier
    pub voice: String,
    /// LLM sampling temperature
    pub temperature: f64,
    /// Max response length in characters
    pub max_response_length: usize,
    /// Enable video input on the room transport
    pub enable_video: bool,
    /// Enable the engine's noise-cancellation filter
    pub enable_noise_cancellation: bool,
    /// Tool descriptors advertised to the LLM
    pub tools: Vec<ToolDescriptor>,
    /// Established bridge connection
    pub bridge: BridgeHandle,
}

/// One realtime speech/LLM session, as seen from the orchestrator.
///
/// The engine itself is an external collaborator; this trait is its documented
/// interface.
#[async_trait]
pub trait RealtimeSession: Send {
    /// Bind persona, tools and bridge, creating the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the session.
    async fn start(&mut self, options: &SessionStartOptions) -> Result<()>;

    /// Connect the room/audio transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be connected.
    async fn connect(&mut self) -> Result<()>;

    /// Issue one instruction turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the turn.
    async fn generate_reply(&mut self, instructions: &str) -> Result<()>;
}

/// Session orchestrator: bridge connector result + persona + tool registry
pub struct Orchestrator {
    config: Config,
    registry: ToolRegistry,
    bridge_settings: BridgeSettings,
}

impl Orchestrator {
    /// Create an orchestrator for one session
    #[must_use]
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config,
            registry,
            bridge_settings: BridgeSettings::default(),
        }
    }

    /// Override the bridge warm-up/backoff schedule (attempt count still
    /// comes from the configuration)
    #[must_use]
    pub fn with_bridge_settings(mut self, settings: BridgeSettings) -> Self {
        self.bridge_settings = settings;
        self
    }

    /// Run one session from bridge connection to the opening instruction turn.
    ///
    /// This is the single layer allowed to propagate fatal errors upward; every
    /// failure is logged with context before being re-raised.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bridge` when the bridge never becomes available, and
    /// forwards any engine error from session startup.
    pub async fn run<S: RealtimeSession>(
        &self,
        transport: &dyn BridgeTransport,
        session: &mut S,
    ) -> Result<()> {
        tracing::info!(
            agent = %self.config.agent.name,
            tools = self.registry.len(),
            "starting agent with smart-home bridge integration"
        );

        let settings = BridgeSettings {
            max_attempts: self.config.bridge.retry_attempts,
            ..self.bridge_settings.clone()
        };

        let handle = bridge::connect(
            transport,
            self.config.bridge.url.as_deref(),
            self.config.bridge.token.as_ref(),
            &settings,
        )
        .await;

        let Some(handle) = handle else {
            tracing::error!("agent cannot start without the smart-home bridge");
            return Err(Error::Bridge(
                "bridge unavailable: connection could not be established".to_string(),
            ));
        };

        let options = SessionStartOptions {
            instructions: AGENT_INSTRUCTION.to_string(),
            voice: self.config.agent.voice.clone(),
            temperature: self.config.agent.temperature,
            max_response_length: self.config.agent.max_response_length,
            enable_video: self.config.agent.enable_video,
            enable_noise_cancellation: self.config.agent.enable_noise_cancellation,
            tools: self.registry.descriptors(),
            bridge: handle,
        };

        session.start(&options).await.inspect_err(
            |e| tracing::error!(error = %e, "failed to start realtime session"),
        )?;

        session.connect().await.inspect_err(
            |e| tracing::error!(error = %e, "failed to connect room transport"),
        )?;

        let opening = format!("{SESSION_INSTRUCTION}{BRIDGE_TROUBLESHOOTING}");
        session.generate_reply(&opening).await.inspect_err(
            |e| tracing::error!(error = %e, "failed to issue opening instruction turn"),
        )?;

        tracing::info!("session started");
        Ok(())
    }
}

//! Friday - Voice-driven personal assistant worker
//!
//! This library provides the core functionality for the Friday worker:
//! - Smart-home bridge connection (retried SSE endpoint with bearer auth)
//! - Tool registry exposed to the realtime speech/LLM session
//! - Session orchestration (bridge-first startup, opening instruction turn)
//! - Standalone health check
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Realtime Speech/LLM Engine              │
//! │        (external: audio, STT, LLM, TTS)              │
//! └────────────────────┬────────────────────────────────┘
//!                      │ tool calls / instruction turns
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Friday Worker                        │
//! │  Orchestrator │ Tool Registry │ Bridge Connector    │
//! └───────┬──────────────┬──────────────────┬───────────┘
//!         │              │                  │
//!     Smart-Home     Weather / Search    OS Metrics
//!      Bridge        / Time adapters     (sysinfo)
//! ```

pub mod bridge;
pub mod check;
pub mod config;
pub mod error;
pub mod prompts;
pub mod session;
pub mod tools;

pub use bridge::{BridgeHandle, BridgeSettings, BridgeTransport, SseTransport};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Orchestrator, RealtimeSession, SessionStartOptions};
pub use tools::{FailureKind, Tool, ToolDescriptor, ToolRegistry, ToolReply};

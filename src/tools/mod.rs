//! Tool registry and adapter dispatch
//!
//! Each adapter wraps one external capability and normalizes success and
//! failure into a renderable string. Adapters never let an error escape their
//! boundary: the session loop always receives tool output it can speak.

pub mod search;
pub mod system;
pub mod time;
pub mod weather;

use std::sync::Arc;

use async_trait::async_trait;

pub use search::{DuckDuckGo, SearchBackend, SearchTool};
pub use system::SystemStatusTool;
pub use time::TimeTool;
pub use weather::{CurrentWeather, GeoLocation, OpenMeteoApi, WeatherApi, WeatherTool};

/// Why an adapter invocation did not produce a useful answer.
///
/// Kept alongside the user-facing message so tests and callers can branch on
/// the kind of failure instead of matching display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested entity could not be resolved (unknown city, etc.)
    NotFound,
    /// The backing service did not answer in time
    Timeout,
    /// The backing service answered with an error
    Upstream,
    /// The input was malformed (bad timezone name, bad arguments)
    InvalidInput,
    /// The service answered but had nothing useful to say
    Empty,
    /// The capability is not available on this host
    Unavailable,
    /// Anything else
    Internal,
}

/// Outcome of one adapter invocation.
///
/// Both variants carry a complete user-presentable string; the failure variant
/// additionally tags the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    /// The adapter produced an answer
    Success(String),
    /// The adapter handled a failure and describes it
    Failure(FailureKind, String),
}

impl ToolReply {
    /// Build a failure reply
    #[must_use]
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure(kind, message.into())
    }

    /// Render the reply as the string handed back to the session loop
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(_, text) => text,
        }
    }

    /// Failure kind, if this reply is a failure
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(kind, _) => Some(*kind),
        }
    }
}

/// Self-describing metadata for one registered tool
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Function name the LLM invokes
    pub name: &'static str,
    /// Human description surfaced to the LLM
    pub description: &'static str,
    /// JSON schema for the parameters object
    pub parameters: serde_json::Value,
}

/// One callable adapter exposed to the realtime session
#[async_trait]
pub trait Tool: Send + Sync {
    /// Descriptor advertised to the session layer
    fn descriptor(&self) -> ToolDescriptor;

    /// Invoke the adapter with validated parameters.
    ///
    /// Implementations must resolve every internal error to a
    /// `ToolReply::Failure` — nothing propagates past this boundary.
    async fn invoke(&self, args: serde_json::Value) -> ToolReply;
}

/// Ordered, fixed set of adapters exposed as invocable functions.
///
/// Built once at process start and never mutated at runtime.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Append a tool, preserving registration order
    #[must_use]
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Descriptors for every registered tool, in registration order
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch an LLM-issued function call to the backing adapter.
    ///
    /// Always resolves to a renderable string, including for unknown tool
    /// names.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.descriptor().name == name) else {
            tracing::warn!(tool = name, "dispatch requested for unknown tool");
            return format!("Tool '{name}' is not available.");
        };

        let reply = tool.invoke(args).await;
        if let Some(kind) = reply.failure_kind() {
            tracing::warn!(tool = name, ?kind, "tool invocation failed");
        }

        reply.into_text()
    }
}

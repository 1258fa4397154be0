//! Configuration management for the Friday worker
//!
//! Everything is resolved from the process environment exactly once at startup
//! and passed down by value. Nothing re-reads the environment mid-session.

use secrecy::SecretString;

use crate::{Error, Result};

/// Complete worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Smart-home bridge connection settings
    pub bridge: BridgeConfig,

    /// Smart-home REST API settings (diagnostic only); absent when no token is set
    pub home_assistant: Option<HomeAssistantConfig>,

    /// Agent persona and session options
    pub agent: AgentConfig,

    /// Realtime engine endpoint
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Smart-home bridge (tool-provider) connection settings
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Bridge SSE endpoint URL (from `HOME_ASSISTANT_MCP_URL`)
    pub url: Option<String>,

    /// Bearer token for the bridge (from `HOME_ASSISTANT_TOKEN`)
    pub token: Option<SecretString>,

    /// Connection attempts before giving up (from `HA_MCP_RETRY_ATTEMPTS`)
    pub retry_attempts: u32,

    /// Per-attempt timeout in seconds (from `HA_MCP_TIMEOUT`)
    pub timeout_secs: u64,
}

/// Smart-home REST API settings, used only by the health check
#[derive(Debug, Clone)]
pub struct HomeAssistantConfig {
    /// REST base URL (from `HA_URL`); scheme-prefixed with `http://` if missing
    pub url: String,

    /// Long-lived access token (from `HA_TOKEN`)
    pub token: SecretString,
}

/// Agent persona and session options
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Display name (from `AGENT_NAME`)
    pub name: String,

    /// Voice identifier passed to the engine (from `AGENT_VOICE`)
    pub voice: String,

    /// LLM sampling temperature (from `AGENT_TEMPERATURE`)
    pub temperature: f64,

    /// Max response length in characters (from `AGENT_MAX_RESPONSE_LENGTH`)
    pub max_response_length: usize,

    /// Enable video input on the room transport (from `AGENT_ENABLE_VIDEO`)
    pub enable_video: bool,

    /// Enable the engine's noise-cancellation filter
    /// (from `AGENT_ENABLE_NOISE_CANCELLATION`)
    pub enable_noise_cancellation: bool,
}

/// Realtime speech/LLM engine endpoint
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine base URL (from `REALTIME_ENGINE_URL`)
    pub url: String,

    /// Engine API key (from `GOOGLE_API_KEY`)
    pub api_key: Option<SecretString>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Default multi-field format
    #[default]
    Full,
    /// Single-line compact format
    Compact,
    /// Multi-line human-oriented format
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (from `LOG_LEVEL`)
    pub level: String,

    /// Output format (from `LOG_FORMAT`)
    pub format: LogFormat,

    /// Optional log file path (from `LOG_FILE_PATH`); stderr when unset
    pub file_path: Option<String>,
}

const DEFAULT_HA_URL: &str = "http://homeassistant.local:8123";
const DEFAULT_ENGINE_URL: &str = "https://generativelanguage.googleapis.com";

impl Config {
    /// Load the full configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a numeric or boolean variable is set but
    /// malformed. Missing credentials are not errors here; they surface later
    /// as an absent bridge handle or a diagnostic finding.
    pub fn load() -> Result<Self> {
        Ok(Self {
            bridge: BridgeConfig::from_env()?,
            home_assistant: HomeAssistantConfig::from_env(),
            agent: AgentConfig::from_env()?,
            engine: EngineConfig::from_env(),
            logging: LoggingConfig::from_env()?,
        })
    }
}

impl BridgeConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env_var("HOME_ASSISTANT_MCP_URL"),
            token: env_var("HOME_ASSISTANT_TOKEN").map(SecretString::from),
            retry_attempts: parse_var("HA_MCP_RETRY_ATTEMPTS", 3)?,
            timeout_secs: parse_var("HA_MCP_TIMEOUT", 30)?,
        })
    }
}

impl HomeAssistantConfig {
    fn from_env() -> Option<Self> {
        Self::build(env_var("HA_TOKEN"), env_var("HA_URL"))
    }

    /// Build the REST config; `None` when the token is absent.
    ///
    /// Tokens are never defaulted. The URL may be, and gets an `http://`
    /// prefix when the scheme is missing.
    fn build(token: Option<String>, url: Option<String>) -> Option<Self> {
        let token = token?;
        let url = url.unwrap_or_else(|| DEFAULT_HA_URL.to_string());

        Some(Self {
            url: ensure_scheme(&url),
            token: SecretString::from(token),
        })
    }
}

impl AgentConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            name: env_var("AGENT_NAME").unwrap_or_else(|| "Friday".to_string()),
            voice: env_var("AGENT_VOICE").unwrap_or_else(|| "default".to_string()),
            temperature: parse_var("AGENT_TEMPERATURE", 0.7)?,
            max_response_length: parse_var("AGENT_MAX_RESPONSE_LENGTH", 1000)?,
            enable_video: bool_var("AGENT_ENABLE_VIDEO", false)?,
            enable_noise_cancellation: bool_var("AGENT_ENABLE_NOISE_CANCELLATION", true)?,
        })
    }
}

impl EngineConfig {
    fn from_env() -> Self {
        Self {
            url: env_var("REALTIME_ENGINE_URL")
                .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string()),
            api_key: env_var("GOOGLE_API_KEY").map(SecretString::from),
        }
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self> {
        let format = match env_var("LOG_FORMAT").as_deref() {
            None | Some("full") => LogFormat::Full,
            Some("compact") => LogFormat::Compact,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(Error::Config(format!(
                    "LOG_FORMAT must be full, compact or pretty, got {other:?}"
                )));
            }
        };

        Ok(Self {
            level: env_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
            file_path: env_var("LOG_FILE_PATH"),
        })
    }
}

/// Read an environment variable, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parse a typed environment variable with a default
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    parse_value(name, env_var(name), default)
}

/// Parse a raw value with a default; `name` only labels the error
fn parse_value<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    raw.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| Error::Config(format!("invalid value for {name}: {raw:?}")))
    })
}

/// Parse a boolean environment variable ("true"/"false", case-insensitive)
fn bool_var(name: &str, default: bool) -> Result<bool> {
    bool_value(name, env_var(name), default)
}

fn bool_value(name: &str, raw: Option<String>, default: bool) -> Result<bool> {
    raw.map_or(Ok(default), |raw| match raw.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::Config(format!(
            "invalid boolean for {name}: {raw:?}"
        ))),
    })
}

/// Prefix a URL with `http://` when no scheme is present
fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

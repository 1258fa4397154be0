//! Thin HTTP client for the realtime speech/LLM engine
//!
//! Nearly everything interesting happens inside the engine; this client only
//! creates a session, connects its room transport and posts instruction turns.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{RealtimeSession, SessionStartOptions};
use crate::config::EngineConfig;
use crate::{Error, Result};

/// Pass-through client for the engine's session API
pub struct RealtimeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
}

impl RealtimeClient {
    /// Create a client from engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no API key is configured.
    pub fn new(engine: &EngineConfig) -> Result<Self> {
        let Some(api_key) = engine.api_key.clone() else {
            return Err(Error::Config(
                "GOOGLE_API_KEY is required to reach the realtime engine".to_string(),
            ));
        };

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: engine.url.trim_end_matches('/').to_string(),
            api_key,
            session_id: None,
        })
    }

    fn session_id(&self) -> Result<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| Error::Session("no active session".to_string()))
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Session(format!(
                "engine returned status {status}: {body}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl RealtimeSession for RealtimeClient {
    async fn start(&mut self, options: &SessionStartOptions) -> Result<()> {
        let tools: Vec<serde_json::Value> = options
            .tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                })
            })
            .collect();

        let body = serde_json::json!({
            "instructions": options.instructions,
            "voice": options.voice,
            "temperature": options.temperature,
            "max_response_length": options.max_response_length,
            "video": options.enable_video,
            "noise_cancellation": options.enable_noise_cancellation,
            "tools": tools,
            "bridge": {
                "url": options.bridge.url(),
                "token": options.bridge.token().expose_secret(),
            },
        });

        let url = format!("{}/v1/realtime/sessions", self.base_url);
        let created: SessionCreated = self.post(&url, body).await?.json().await?;

        tracing::debug!(session_id = %created.id, "realtime session created");
        self.session_id = Some(created.id);
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        let url = format!(
            "{}/v1/realtime/sessions/{}/connect",
            self.base_url,
            self.session_id()?
        );
        self.post(&url, serde_json::json!({})).await?;
        Ok(())
    }

    async fn generate_reply(&mut self, instructions: &str) -> Result<()> {
        let url = format!(
            "{}/v1/realtime/sessions/{}/responses",
            self.base_url,
            self.session_id()?
        );
        self.post(&url, serde_json::json!({ "instructions": instructions }))
            .await?;
        Ok(())
    }
}

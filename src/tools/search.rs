//! Web search adapter via the `DuckDuckGo` Instant Answer API (keyless)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{FailureKind, Tool, ToolDescriptor, ToolReply};
use crate::{Error, Result};

/// Results longer than this are truncated before being spoken
const MAX_RESULT_CHARS: usize = 1000;

/// Results shorter than this (after trimming) count as no answer
const MIN_RESULT_CHARS: usize = 10;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";

/// A backing search service returning raw result text
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query and return the combined result text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decoding failure.
    async fn run(&self, query: &str) -> Result<String>;
}

/// `DuckDuckGo` Instant Answer backend
pub struct DuckDuckGo {
    client: reqwest::Client,
}

impl DuckDuckGo {
    /// Create the backend with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    async fn run(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(DUCKDUCKGO_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let answer: InstantAnswer = response.json().await?;

        // Prefer the direct answer, then the abstract, then related topics
        if !answer.answer.is_empty() {
            return Ok(answer.answer);
        }
        if !answer.abstract_text.is_empty() {
            return Ok(answer.abstract_text);
        }

        let topics: Vec<&str> = answer
            .related_topics
            .iter()
            .map(|t| t.text.as_str())
            .filter(|t| !t.is_empty())
            .take(5)
            .collect();

        Ok(topics.join(" "))
    }
}

/// Truncate result text to the first `MAX_RESULT_CHARS` characters with an
/// ellipsis marker, counting characters rather than bytes.
#[must_use]
pub fn truncate_result(text: &str) -> String {
    if text.chars().count() <= MAX_RESULT_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(MAX_RESULT_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// Web search adapter exposed to the session as `search_web`
pub struct SearchTool {
    backend: Arc<dyn SearchBackend>,
}

impl SearchTool {
    /// Create the adapter over a backend
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    async fn search(&self, query: &str) -> ToolReply {
        match self.backend.run(query).await {
            Ok(results) => {
                if results.trim().chars().count() < MIN_RESULT_CHARS {
                    return ToolReply::failure(
                        FailureKind::Empty,
                        format!(
                            "No relevant results found for '{query}'. Please try a different search term."
                        ),
                    );
                }

                tracing::info!(query, "search completed");
                ToolReply::Success(truncate_result(&results))
            }
            Err(e) => {
                tracing::error!(query, error = %e, "web search failed");
                ToolReply::failure(
                    FailureKind::Upstream,
                    format!("Search error for '{query}'. Please try again or rephrase your query."),
                )
            }
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "search_web",
            description: "Search the web for current information",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to look up"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn invoke(&self, args: serde_json::Value) -> ToolReply {
        let Some(query) = args.get("query").and_then(|v| v.as_str()) else {
            return ToolReply::failure(
                FailureKind::InvalidInput,
                "Missing 'query' parameter for the web search.",
            );
        };

        self.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        let text = "a short result";
        assert_eq!(truncate_result(text), text);
    }

    #[test]
    fn long_text_is_cut_at_character_boundary() {
        let text = "é".repeat(1500);
        let out = truncate_result(&text);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), MAX_RESULT_CHARS + 3);
    }

    #[test]
    fn exactly_max_length_is_untouched() {
        let text = "x".repeat(MAX_RESULT_CHARS);
        assert_eq!(truncate_result(&text), text);
    }
}

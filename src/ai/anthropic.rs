//! Anthropic API Provider
//!
//! LLM provider using Anthropic's Messages API. The default provider for
//! documentation enhancement; requires `ANTHROPIC_API_KEY`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{LlmProvider, ProviderConfig};
use crate::types::{DocflowError, ErrorClassifier, Result};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider with secure API key handling
pub struct AnthropicProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                DocflowError::Config(
                    "Anthropic API key not found. Set ANTHROPIC_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocflowError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    async fn send(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                DocflowError::Llm(ErrorClassifier::classify(
                    &format!("Anthropic request failed: {}", e),
                    "anthropic",
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocflowError::Llm(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Anthropic API error ({}): {}", status, body),
                "anthropic",
            )));
        }

        response.json().await.map_err(|e| {
            DocflowError::Llm(ErrorClassifier::classify(
                &format!("Failed to parse Anthropic response: {}", e),
                "anthropic",
            ))
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        info!(
            model = %self.model,
            temperature = self.temperature,
            "generating with Anthropic"
        );

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self.send(&request).await?;

        let text = response
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(DocflowError::Llm(ErrorClassifier::classify(
                "No text content in Anthropic response",
                "anthropic",
            )));
        }

        debug!(chars = text.len(), "received Anthropic response");
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        // The Messages API has no cheap read endpoint, so the probe is a
        // one-token request
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1,
            temperature: 0.0,
            system: None,
            messages: vec![Message {
                role: "user".to_string(),
                content: "ping".to_string(),
            }],
        };

        match self.send(&request).await {
            Ok(_) => {
                info!("Anthropic API is available");
                Ok(true)
            }
            Err(e) => {
                warn!("Anthropic API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

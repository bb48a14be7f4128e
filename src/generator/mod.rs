
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::GeneratorConfig;
use crate::query::{ChatMessage, Generator};
use crate::{AssistantError, Result};

/// Environment variable holding the Gemini API key. Credentials are supplied
/// out-of-band; a missing key is a construction-time error so that a pipeline
/// requiring generation fails to build instead of failing per-query.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Client for the Gemini `generateContent` endpoint.
///
/// One call per generation, no retries: a transient failure is surfaced to
/// the orchestrator as a hard stop for the current resolution.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: Url,
    model: String,
    api_key: String,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    /// Build a client with an explicit API key.
    #[inline]
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AssistantError::Config(
                "Gemini API key cannot be empty".to_string(),
            ));
        }

        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| AssistantError::Config(format!("Invalid generator base URL: {}", e)))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.model.clone(),
            api_key,
            agent,
        })
    }

    /// Build a client from the environment. Fails fast when the key is
    /// absent so callers never hold a generator that cannot generate.
    #[inline]
    pub fn from_env(config: &GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var(GOOGLE_API_KEY_VAR).map_err(|_| {
            AssistantError::Config(format!(
                "{} is not set; answer generation is unavailable",
                GOOGLE_API_KEY_VAR
            ))
        })?;
        Self::new(config, api_key)
    }

    #[inline]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one message to the model and return its reply text.
    #[inline]
    pub fn generate_reply(&self, message: &ChatMessage) -> Result<String> {
        debug!(
            "Generating reply with model {} ({} chars of input)",
            self.model,
            message.content.len()
        );

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            }],
        };

        let url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| AssistantError::Config(format!("Failed to build generate URL: {}", e)))?;

        let request_json = serde_json::to_string(&request).map_err(|e| {
            AssistantError::Generation(format!("Failed to serialize generate request: {}", e))
        })?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| AssistantError::Generation(format!("Generate request failed: {}", e)))?;

        let response: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            AssistantError::Generation(format!("Failed to parse generate response: {}", e))
        })?;

        let reply = response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| {
                AssistantError::Generation("Model returned no candidates".to_string())
            })?;

        debug!("Model reply has {} chars", reply.len());
        Ok(reply)
    }
}

impl Generator for GeminiClient {
    #[inline]
    fn generate(&self, message: &ChatMessage) -> Result<String> {
        self.generate_reply(message)
    }
}


use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::query::WebSearch;
use crate::store::Passage;
use crate::{AssistantError, Result};

/// Environment variable holding the Serper.dev API key. When it is absent
/// the pipeline is built without the web search capability.
pub const SERPER_API_KEY_VAR: &str = "SERPERDEV_API_KEY";

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_RESULT_COUNT: usize = 10;

/// Serper.dev search client. Results become passages tagged with their
/// source URL; they carry no similarity score since web results are not
/// ranked in the local embedding space.
#[derive(Debug, Clone)]
pub struct SerperClient {
    base_url: Url,
    api_key: String,
    agent: ureq::Agent,
    result_count: usize,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerperClient {
    #[inline]
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AssistantError::Config(
                "Serper API key cannot be empty".to_string(),
            ));
        }

        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| AssistantError::Config(format!("Invalid search base URL: {}", e)))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key,
            agent,
            result_count: DEFAULT_RESULT_COUNT,
        })
    }

    /// Build a client from the environment, or `None` when no key is set.
    #[inline]
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(SERPER_API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key).map(Some),
            _ => Ok(None),
        }
    }

    #[inline]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    #[inline]
    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    /// Run one web search and map organic results to passages.
    #[inline]
    pub fn search_web(&self, query: &str) -> Result<Vec<Passage>> {
        debug!("Searching the web for: {}", query);

        let request = SearchRequest {
            q: query,
            num: self.result_count,
        };

        let url = self
            .base_url
            .join("search")
            .map_err(|e| AssistantError::Config(format!("Failed to build search URL: {}", e)))?;

        let request_json = serde_json::to_string(&request).map_err(|e| {
            AssistantError::WebSearch(format!("Failed to serialize search request: {}", e))
        })?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header("X-API-KEY", &self.api_key)
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| AssistantError::WebSearch(format!("Search request failed: {}", e)))?;

        let response: SearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            AssistantError::WebSearch(format!("Failed to parse search response: {}", e))
        })?;

        let passages: Vec<Passage> = response
            .organic
            .into_iter()
            .map(result_to_passage)
            .collect();

        debug!("Web search produced {} passages", passages.len());
        Ok(passages)
    }
}

fn result_to_passage(result: OrganicResult) -> Passage {
    let content = if result.snippet.is_empty() {
        result.title
    } else if result.title.is_empty() {
        result.snippet
    } else {
        format!("{}\n{}", result.title, result.snippet)
    };
    Passage::new(content, result.link)
}

impl WebSearch for SerperClient {
    #[inline]
    fn search(&self, query: &str) -> Result<Vec<Passage>> {
        self.search_web(query)
    }
}

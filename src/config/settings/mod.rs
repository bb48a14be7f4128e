#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages retrieved per query.
    pub top_k: usize,
    /// Cap on generator invocations per resolution, bounding the
    /// local-to-web fallback cycle.
    pub max_generations: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_generations: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexingConfig {
    pub urls: Vec<String>,
    /// Passage length in words.
    pub split_length: usize,
    /// Overlap between consecutive passages, in words.
    pub split_overlap: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            urls: default_corpus_urls(),
            split_length: 100,
            split_overlap: 10,
        }
    }
}

fn default_corpus_urls() -> Vec<String> {
    [
        "https://pandas.pydata.org/docs/user_guide/indexing.html",
        "https://pandas.pydata.org/docs/user_guide/visualization.html",
        "https://pandas.pydata.org/docs/user_guide/cookbook.html",
        "https://pandas.pydata.org/docs/user_guide/merging.html",
        "https://numpy.org/doc/stable/reference/random/index.html",
        "https://numpy.org/doc/stable/reference/arrays.indexing.html",
        "https://scikit-learn.org/stable/modules/linear_model.html",
        "https://scikit-learn.org/stable/modules/clustering.html",
        "https://docs.haystack.deepset.ai/docs/pipelines",
        "https://docs.haystack.deepset.ai/docs/retriever",
        "https://haystack.deepset.ai/tutorials/27_first_rag_pipeline",
        "https://haystack.deepset.ai/tutorials/43_building_a_tool_calling_agent",
        "https://haystack.deepset.ai/tutorials/40_building_chat_application_with_function_calling",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid top_k: {0} (must be between 1 and 50)")]
    InvalidTopK(usize),
    #[error("Invalid max_generations: {0} (must be between 1 and 20)")]
    InvalidMaxGenerations(usize),
    #[error("Invalid split length: {0} (must be between 10 and 1000 words)")]
    InvalidSplitLength(usize),
    #[error("Split overlap ({0}) must be smaller than split length ({1})")]
    OverlapTooLarge(usize, usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from the platform config directory, falling back
    /// to defaults when no config file exists yet.
    #[inline]
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path().context("Failed to get config file path")?;
        Self::load_from(&config_path)
    }

    #[inline]
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = Self::config_dir().context("Failed to get config directory")?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = Self::config_file_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("docs-assistant"))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the persisted passage store.
    #[inline]
    pub fn store_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("passages.json"))
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;

        if self.generator.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.generator.model.clone()));
        }

        if self.retrieval.top_k == 0 || self.retrieval.top_k > 50 {
            return Err(ConfigError::InvalidTopK(self.retrieval.top_k));
        }

        if self.retrieval.max_generations == 0 || self.retrieval.max_generations > 20 {
            return Err(ConfigError::InvalidMaxGenerations(
                self.retrieval.max_generations,
            ));
        }

        if self.indexing.split_length < 10 || self.indexing.split_length > 1000 {
            return Err(ConfigError::InvalidSplitLength(self.indexing.split_length));
        }

        if self.indexing.split_overlap >= self.indexing.split_length {
            return Err(ConfigError::OverlapTooLarge(
                self.indexing.split_overlap,
                self.indexing.split_length,
            ));
        }

        Ok(())
    }
}

impl EmbeddingConfig {
    /// Base URL of the embedding server.
    #[inline]
    pub fn url(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw))
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        self.url()?;
        Ok(())
    }
}

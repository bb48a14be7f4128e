
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::{AssistantError, Result};

const STORE_FORMAT_VERSION: u32 = 1;

/// A unit of indexed text. Passages are created during indexing (or by the
/// web search fallback) and never mutated afterwards; the store retires them
/// only by full replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub source: String,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl Passage {
    #[inline]
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            embedding: None,
        }
    }

    #[inline]
    pub fn with_embedding(
        content: impl Into<String>,
        source: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            embedding: Some(embedding),
        }
    }
}

/// A passage paired with its similarity to a probe embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub similarity: f32,
}

/// In-memory passage store searchable by cosine similarity.
///
/// The store is pinned to a single embedding model identity: every stored
/// embedding and every probe must come from the same model, or similarity
/// scores are meaningless. Loading a persisted store built with a different
/// model is refused.
#[derive(Debug, Clone, PartialEq)]
pub struct PassageStore {
    passages: Vec<Passage>,
    embedding_model: String,
    indexed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct PersistedStore<'a> {
    version: u32,
    embedding_model: &'a str,
    indexed_at: Option<DateTime<Utc>>,
    passages: &'a [Passage],
}

#[derive(Deserialize)]
struct PersistedStoreOwned {
    version: u32,
    embedding_model: String,
    indexed_at: Option<DateTime<Utc>>,
    passages: Vec<Passage>,
}

impl PassageStore {
    #[inline]
    pub fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            passages: Vec::new(),
            embedding_model: embedding_model.into(),
            indexed_at: None,
        }
    }

    #[inline]
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    #[inline]
    pub fn indexed_at(&self) -> Option<DateTime<Utc>> {
        self.indexed_at
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Append passages to the store. Insertion order is preserved and serves
    /// as the tie-break order for equal-similarity search results.
    #[inline]
    pub fn insert(&mut self, passages: Vec<Passage>) {
        debug!("Inserting {} passages into store", passages.len());
        self.passages.extend(passages);
    }

    /// Replace the full contents of the store and stamp the index time.
    /// Individual passages are never deleted; re-indexing goes through here.
    #[inline]
    pub fn replace_all(&mut self, passages: Vec<Passage>) {
        info!("Replacing store contents with {} passages", passages.len());
        self.passages = passages;
        self.indexed_at = Some(Utc::now());
    }

    /// Nearest-neighbor search by cosine similarity.
    ///
    /// Returns at most `k` passages in descending similarity order. Ties keep
    /// insertion order (the sort is stable). Passages without an embedding
    /// are skipped. An empty store yields an empty result, not an error.
    #[inline]
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredPassage> {
        if self.passages.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredPassage> = self
            .passages
            .iter()
            .filter_map(|passage| {
                let Some(embedding) = passage.embedding.as_deref() else {
                    warn!("Skipping passage without embedding: {}", passage.source);
                    return None;
                };
                Some(ScoredPassage {
                    passage: passage.clone(),
                    similarity: cosine_similarity(query_embedding, embedding),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        debug!("Search returned {} passages", scored.len());
        scored
    }

    /// Persist the store as JSON, recording the embedding model identity.
    #[inline]
    pub fn save(&self, path: &Path) -> Result<()> {
        let state = PersistedStore {
            version: STORE_FORMAT_VERSION,
            embedding_model: &self.embedding_model,
            indexed_at: self.indexed_at,
            passages: &self.passages,
        };

        let data = serde_json::to_string(&state)
            .map_err(|e| AssistantError::Store(format!("Failed to serialize store: {}", e)))?;
        fs::write(path, data)?;

        debug!("Saved {} passages to {}", self.passages.len(), path.display());
        Ok(())
    }

    /// Load a persisted store, refusing one built with a different embedding
    /// model than `expected_model`.
    #[inline]
    pub fn load(path: &Path, expected_model: &str) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let state: PersistedStoreOwned = serde_json::from_str(&data)
            .map_err(|e| AssistantError::Store(format!("Failed to parse store file: {}", e)))?;

        if state.version != STORE_FORMAT_VERSION {
            return Err(AssistantError::Store(format!(
                "Unsupported store format version {} (expected {}); re-index the corpus",
                state.version, STORE_FORMAT_VERSION
            )));
        }

        if state.embedding_model != expected_model {
            return Err(AssistantError::Store(format!(
                "Store was built with embedding model '{}' but '{}' is configured; re-index the corpus",
                state.embedding_model, expected_model
            )));
        }

        info!(
            "Loaded {} passages (model: {})",
            state.passages.len(),
            state.embedding_model
        );

        Ok(Self {
            passages: state.passages,
            embedding_model: state.embedding_model,
            indexed_at: state.indexed_at,
        })
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched dimensions or
/// zero-norm inputs.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

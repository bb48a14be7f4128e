// Indexer module
// Straight-line batch pipeline: fetch -> extract -> split -> embed -> store

#[cfg(test)]
mod tests;

pub mod extractor;
pub mod splitter;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::IndexingConfig;
use crate::query::Embedder;
use crate::store::{Passage, PassageStore};
use crate::{AssistantError, Result};

pub use extractor::extract_text;
pub use splitter::split_words;

const FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Statistics for one indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexingStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub passages_created: usize,
}

/// Batch indexer for the configured documentation corpus.
///
/// Per-page failures are logged and counted but do not abort the batch; the
/// store ends up with whatever subset of the corpus was reachable.
pub struct DocumentIndexer<'a> {
    embedder: &'a dyn Embedder,
    agent: ureq::Agent,
    split_length: usize,
    split_overlap: usize,
}

impl<'a> DocumentIndexer<'a> {
    #[inline]
    pub fn new(embedder: &'a dyn Embedder, config: &IndexingConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT_SECONDS)))
            .build()
            .into();

        Self {
            embedder,
            agent,
            split_length: config.split_length,
            split_overlap: config.split_overlap,
        }
    }

    /// Index `urls` into `store`, replacing its previous contents.
    #[inline]
    pub fn index(&self, urls: &[String], store: &mut PassageStore) -> Result<IndexingStats> {
        info!("Indexing {} documentation pages", urls.len());

        let progress = ProgressBar::new(urls.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut stats = IndexingStats::default();
        let mut passages = Vec::new();

        for url in urls {
            progress.set_message(url.clone());

            match self.index_page(url) {
                Ok(mut page_passages) => {
                    stats.pages_fetched += 1;
                    stats.passages_created += page_passages.len();
                    passages.append(&mut page_passages);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    stats.pages_failed += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_and_clear();

        store.replace_all(passages);

        info!(
            "Indexing complete: {} pages fetched, {} failed, {} passages",
            stats.pages_fetched, stats.pages_failed, stats.passages_created
        );
        Ok(stats)
    }

    /// Fetch, extract, split, and embed one page.
    fn index_page(&self, url: &str) -> Result<Vec<Passage>> {
        let html = self.fetch_page(url)?;
        let text = extract_text(&html)?;

        if text.trim().is_empty() {
            warn!("No content extracted from {}", url);
            return Ok(Vec::new());
        }

        let chunks = split_words(&text, self.split_length, self.split_overlap);
        debug!("Split {} into {} chunks", url, chunks.len());

        let mut passages = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk)?;
            passages.push(Passage::with_embedding(chunk, url, embedding));
        }

        Ok(passages)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        self.agent
            .get(url)
            .call()
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| AssistantError::Network(format!("Failed to fetch {}: {}", url, e)))
    }
}

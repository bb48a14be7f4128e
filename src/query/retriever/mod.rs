#[cfg(test)]
mod tests;

use tracing::debug;

use super::Embedder;
use crate::Result;
use crate::store::{PassageStore, ScoredPassage};

/// Ordered retrieval output: at most `k` passages, descending similarity,
/// ties stable by insertion order.
pub type RetrievalResult = Vec<ScoredPassage>;

/// Embed `query` and return the top `k` passages from `store` by cosine
/// similarity.
///
/// The embedder must carry the same model identity the store was indexed
/// with; mismatched embedding spaces produce meaningless scores, which is
/// why the store pins the model at load time. An empty store yields an empty
/// result, a valid "no local evidence" state.
#[inline]
pub fn retrieve(
    query: &str,
    embedder: &dyn Embedder,
    store: &PassageStore,
    k: usize,
) -> Result<RetrievalResult> {
    if store.is_empty() {
        debug!("Passage store is empty, returning no local evidence");
        return Ok(Vec::new());
    }

    let query_embedding = embedder.embed(query)?;
    let results = store.search(&query_embedding, k);

    debug!("Retrieved {} passages for query", results.len());
    Ok(results)
}

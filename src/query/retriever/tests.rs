use super::*;
use crate::AssistantError;
use crate::store::Passage;

/// Deterministic embedder mapping known strings to fixed vectors.
struct FixedEmbedder(Vec<f32>);

impl Embedder for FixedEmbedder {
    fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
        Err(AssistantError::Embedding("embedding server down".to_string()))
    }
}

fn store_with(passages: Vec<Passage>) -> PassageStore {
    let mut store = PassageStore::new("test-model");
    store.insert(passages);
    store
}

#[test]
fn retrieves_sorted_and_truncated() {
    let store = store_with(vec![
        Passage::with_embedding("far", "u1", vec![0.0, 1.0]),
        Passage::with_embedding("near", "u2", vec![1.0, 0.0]),
        Passage::with_embedding("middle", "u3", vec![1.0, 1.0]),
    ]);
    let embedder = FixedEmbedder(vec![1.0, 0.0]);

    let results = retrieve("probe", &embedder, &store, 2).expect("retrieve should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].passage.content, "near");
    assert_eq!(results[1].passage.content, "middle");
}

#[test]
fn empty_store_returns_empty_without_embedding() {
    let store = PassageStore::new("test-model");
    // An empty store must short-circuit before the embedder is invoked.
    let results =
        retrieve("probe", &FailingEmbedder, &store, 3).expect("empty store is not an error");
    assert!(results.is_empty());
}

#[test]
fn embedder_failure_propagates() {
    let store = store_with(vec![Passage::with_embedding("a", "u", vec![1.0])]);

    let result = retrieve("probe", &FailingEmbedder, &store, 3);
    assert!(matches!(result, Err(AssistantError::Embedding(_))));
}

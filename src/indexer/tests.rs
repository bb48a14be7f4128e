use super::*;
use crate::query::Embedder;

struct CountingEmbedder(std::cell::RefCell<usize>);

impl Embedder for CountingEmbedder {
    fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
        *self.0.borrow_mut() += 1;
        Ok(vec![1.0, 0.0])
    }
}

#[test]
fn indexer_configuration() {
    let embedder = CountingEmbedder(std::cell::RefCell::new(0));
    let config = IndexingConfig {
        split_length: 50,
        split_overlap: 5,
        ..IndexingConfig::default()
    };

    let indexer = DocumentIndexer::new(&embedder, &config);
    assert_eq!(indexer.split_length, 50);
    assert_eq!(indexer.split_overlap, 5);
}

#[test]
fn unreachable_pages_are_counted_not_fatal() {
    let embedder = CountingEmbedder(std::cell::RefCell::new(0));
    let config = IndexingConfig::default();
    let indexer = DocumentIndexer::new(&embedder, &config);

    let mut store = PassageStore::new("test-model");
    // Reserved TLD; DNS resolution fails fast without external traffic.
    let urls = vec!["http://page.invalid/docs.html".to_string()];

    let stats = indexer.index(&urls, &mut store).expect("batch should not abort");
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.passages_created, 0);
    assert!(store.is_empty());
    assert_eq!(*embedder.0.borrow(), 0);
}

#[test]
fn stats_default_is_zeroed() {
    let stats = IndexingStats::default();
    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.pages_failed, 0);
    assert_eq!(stats.passages_created, 0);
}

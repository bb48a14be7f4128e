#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// End-to-end tests of the query-resolution pipeline against stub
// capabilities. No network access is required.

use std::cell::RefCell;

use docs_assistant::AssistantError;
use docs_assistant::query::{
    ChatMessage, Embedder, FailureKind, Generator, QueryPipeline, ResolutionOutcome,
    UnresolvedReason, WebSearch,
};
use docs_assistant::store::{Passage, PassageStore};

/// Embedder producing vectors aligned with passage topics: questions about
/// pandas land near the pandas passage, everything else lands orthogonal.
struct TopicEmbedder;

impl Embedder for TopicEmbedder {
    fn embed(&self, text: &str) -> docs_assistant::Result<Vec<f32>> {
        if text.contains("pandas") {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }
}

/// Generator that answers when the prompt carries evidence mentioning the
/// question topic and emits the sentinel otherwise.
struct EvidenceGenerator {
    transcript: RefCell<Vec<String>>,
}

impl EvidenceGenerator {
    fn new() -> Self {
        Self {
            transcript: RefCell::new(Vec::new()),
        }
    }
}

impl Generator for EvidenceGenerator {
    fn generate(&self, message: &ChatMessage) -> docs_assistant::Result<String> {
        self.transcript.borrow_mut().push(message.content.clone());

        if message.content.contains("df.loc") {
            Ok("Use df.loc with a boolean mask to filter rows.".to_string())
        } else {
            Ok("NO_ANSWER".to_string())
        }
    }
}

struct StubSearch {
    results: Vec<Passage>,
    calls: RefCell<usize>,
}

impl StubSearch {
    fn with_results(results: Vec<Passage>) -> Self {
        Self {
            results,
            calls: RefCell::new(0),
        }
    }
}

impl WebSearch for StubSearch {
    fn search(&self, _query: &str) -> docs_assistant::Result<Vec<Passage>> {
        *self.calls.borrow_mut() += 1;
        Ok(self.results.clone())
    }
}

fn pandas_store() -> PassageStore {
    let mut store = PassageStore::new("test-model");
    store.insert(vec![
        Passage::with_embedding(
            "Filter rows with df.loc using labels or boolean arrays.",
            "https://pandas.pydata.org/docs/user_guide/indexing.html",
            vec![1.0, 0.0],
        ),
        Passage::with_embedding(
            "KMeans clusters samples by minimizing inertia.",
            "https://scikit-learn.org/stable/modules/clustering.html",
            vec![0.0, 1.0],
        ),
    ]);
    store
}

#[test]
fn scenario_a_answered_from_local_store() {
    let pipeline = QueryPipeline::builder()
        .store(pandas_store())
        .embedder(Box::new(TopicEmbedder))
        .generator(Box::new(EvidenceGenerator::new()))
        .build()
        .expect("pipeline should build");

    let outcome = pipeline.resolve("How do I filter rows with pandas loc?");
    assert_eq!(
        outcome,
        ResolutionOutcome::Answered("Use df.loc with a boolean mask to filter rows.".to_string())
    );
}

#[test]
fn scenario_b_empty_store_falls_back_to_web() {
    let web_results = vec![Passage::new(
        "df.loc selects rows by label; combine with a boolean mask to filter.",
        "https://stackoverflow.com/questions/loc-filtering",
    )];
    let search = Box::new(StubSearch::with_results(web_results));

    let generator = EvidenceGenerator::new();
    let transcript = std::rc::Rc::new(generator);
    struct SharedGenerator(std::rc::Rc<EvidenceGenerator>);
    impl Generator for SharedGenerator {
        fn generate(&self, message: &ChatMessage) -> docs_assistant::Result<String> {
            self.0.generate(message)
        }
    }

    let pipeline = QueryPipeline::builder()
        .store(PassageStore::new("test-model"))
        .embedder(Box::new(TopicEmbedder))
        .generator(Box::new(SharedGenerator(std::rc::Rc::clone(&transcript))))
        .web_search(search)
        .build()
        .expect("pipeline should build");

    let outcome = pipeline.resolve("How do I filter rows with pandas loc?");
    assert_eq!(
        outcome,
        ResolutionOutcome::Answered("Use df.loc with a boolean mask to filter rows.".to_string())
    );

    // First pass composed the local template with no documents; second pass
    // used the web template with the search result.
    let seen = transcript.transcript.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].contains("internal documentation"));
    assert!(!seen[0].contains("stackoverflow.com"));
    assert!(seen[1].contains("web-retrieved documents"));
    assert!(seen[1].contains("URL: https://stackoverflow.com/questions/loc-filtering"));
}

#[test]
fn unhelpful_web_results_hit_the_loop_bound() {
    struct SentinelGenerator;
    impl Generator for SentinelGenerator {
        fn generate(&self, _message: &ChatMessage) -> docs_assistant::Result<String> {
            Ok("NO_ANSWER".to_string())
        }
    }

    let search = StubSearch::with_results(vec![Passage::new(
        "Unrelated content.",
        "https://example.com/unrelated",
    )]);
    let calls = std::rc::Rc::new(search);
    struct SharedSearch(std::rc::Rc<StubSearch>);
    impl WebSearch for SharedSearch {
        fn search(&self, query: &str) -> docs_assistant::Result<Vec<Passage>> {
            self.0.search(query)
        }
    }

    let pipeline = QueryPipeline::builder()
        .store(pandas_store())
        .embedder(Box::new(TopicEmbedder))
        .generator(Box::new(SentinelGenerator))
        .web_search(Box::new(SharedSearch(std::rc::Rc::clone(&calls))))
        .max_generations(5)
        .build()
        .expect("pipeline should build");

    let outcome = pipeline.resolve("an unanswerable question");
    assert_eq!(
        outcome,
        ResolutionOutcome::Unresolved(UnresolvedReason::LoopBound)
    );

    // Five generations: one local pass plus four web passes, each preceded
    // by a search.
    assert_eq!(*calls.calls.borrow(), 5);
}

#[test]
fn missing_web_capability_is_a_typed_failure() {
    struct SentinelGenerator;
    impl Generator for SentinelGenerator {
        fn generate(&self, _message: &ChatMessage) -> docs_assistant::Result<String> {
            Ok("NO_ANSWER".to_string())
        }
    }

    let pipeline = QueryPipeline::builder()
        .store(PassageStore::new("test-model"))
        .embedder(Box::new(TopicEmbedder))
        .generator(Box::new(SentinelGenerator))
        .build()
        .expect("pipeline builds without web search");

    let outcome = pipeline.resolve("force the fallback");
    assert_eq!(
        outcome,
        ResolutionOutcome::Failed(FailureKind::Configuration)
    );
}

#[test]
fn external_failures_never_escape_as_errors() {
    struct BrokenGenerator;
    impl Generator for BrokenGenerator {
        fn generate(&self, _message: &ChatMessage) -> docs_assistant::Result<String> {
            Err(AssistantError::Generation("503 from upstream".to_string()))
        }
    }

    let pipeline = QueryPipeline::builder()
        .store(pandas_store())
        .embedder(Box::new(TopicEmbedder))
        .generator(Box::new(BrokenGenerator))
        .build()
        .expect("pipeline should build");

    // resolve() returns a typed outcome, not a Result.
    let outcome = pipeline.resolve("How do I filter rows with pandas loc?");
    assert_eq!(
        outcome,
        ResolutionOutcome::Failed(FailureKind::ExternalService)
    );
    assert!(outcome.diagnostic().contains("temporarily unavailable"));
}


use tracing::{debug, info, warn};

use super::prompt::{PromptContext, compose};
use super::retriever::retrieve;
use super::router::{RouterDecision, route};
use super::{Embedder, Generator, WebSearch};
use crate::store::PassageStore;
use crate::{AssistantError, Result};

const DEFAULT_TOP_K: usize = 3;
const DEFAULT_MAX_GENERATIONS: usize = 5;

/// Terminal outcome of one resolution. No raw capability error crosses this
/// boundary; callers get a typed outcome with a human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Answered(String),
    Unresolved(UnresolvedReason),
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The generation cap was reached without a terminal router decision.
    LoopBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required capability was missing when it was needed.
    Configuration,
    /// The generator or web search call failed (network, auth, quota).
    ExternalService,
    /// The question was empty or blank; rejected before any external call.
    InvalidInput,
}

impl ResolutionOutcome {
    /// Human-readable diagnostic for display; never a raw error dump.
    #[inline]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Answered(text) => text.clone(),
            Self::Unresolved(UnresolvedReason::LoopBound) => {
                "No answer found: the model could not reach a confident answer \
                 within the configured number of attempts."
                    .to_string()
            }
            Self::Failed(FailureKind::Configuration) => {
                "The assistant is missing a required capability. Check that the \
                 web search API key is configured."
                    .to_string()
            }
            Self::Failed(FailureKind::ExternalService) => {
                "The assistant is temporarily unavailable. Please try again later.".to_string()
            }
            Self::Failed(FailureKind::InvalidInput) => {
                "Please enter a non-empty question.".to_string()
            }
        }
    }
}

/// The query-resolution pipeline.
///
/// Wires the retriever, prompt composer, generator, router, and web search
/// fallback into a linear flow with one conditional branch:
///
/// embed -> retrieve -> compose(local) -> generate -> route ->
///   { done | web search -> compose(web) -> generate -> route -> ... }
///
/// The local-to-web cycle is bounded by `max_generations`. The pipeline is
/// read-only with respect to the store and keeps no state across calls.
pub struct QueryPipeline {
    store: PassageStore,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn Generator>,
    web_search: Option<Box<dyn WebSearch>>,
    top_k: usize,
    max_generations: usize,
}

/// Fallible builder for [`QueryPipeline`]. A pipeline missing a required
/// capability fails to build rather than failing per-query.
pub struct QueryPipelineBuilder {
    store: Option<PassageStore>,
    embedder: Option<Box<dyn Embedder>>,
    generator: Option<Box<dyn Generator>>,
    web_search: Option<Box<dyn WebSearch>>,
    top_k: usize,
    max_generations: usize,
}

impl Default for QueryPipelineBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl QueryPipelineBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            store: None,
            embedder: None,
            generator: None,
            web_search: None,
            top_k: DEFAULT_TOP_K,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }

    #[inline]
    pub fn store(mut self, store: PassageStore) -> Self {
        self.store = Some(store);
        self
    }

    #[inline]
    pub fn embedder(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    #[inline]
    pub fn generator(mut self, generator: Box<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Web search is optional; without it, a `NeedsWebSearch` route resolves
    /// to `Failed(Configuration)`.
    #[inline]
    pub fn web_search(mut self, web_search: Box<dyn WebSearch>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    #[inline]
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[inline]
    pub fn max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    #[inline]
    pub fn build(self) -> Result<QueryPipeline> {
        let store = self
            .store
            .ok_or_else(|| AssistantError::Config("Pipeline requires a passage store".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| AssistantError::Config("Pipeline requires an embedder".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| AssistantError::Config("Pipeline requires a generator".to_string()))?;

        if self.top_k == 0 {
            return Err(AssistantError::Config(
                "top_k must be at least 1".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(AssistantError::Config(
                "max_generations must be at least 1".to_string(),
            ));
        }

        if self.web_search.is_none() {
            warn!("Pipeline built without web search; insufficient-context fallback is disabled");
        }

        Ok(QueryPipeline {
            store,
            embedder,
            generator,
            web_search: self.web_search,
            top_k: self.top_k,
            max_generations: self.max_generations,
        })
    }
}

impl QueryPipeline {
    #[inline]
    pub fn builder() -> QueryPipelineBuilder {
        QueryPipelineBuilder::new()
    }

    /// Resolve one question to a terminal outcome.
    ///
    /// Side effects: one embedding call, between one and `max_generations`
    /// generator calls, zero or more web search calls. The store is never
    /// written.
    #[inline]
    pub fn resolve(&self, question: &str) -> ResolutionOutcome {
        let question = question.trim();
        if question.is_empty() {
            debug!("Rejecting blank question before any external call");
            return ResolutionOutcome::Failed(FailureKind::InvalidInput);
        }

        info!("Resolving question: {}", question);

        match self.run(question) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("Resolution failed: {}", error);
                ResolutionOutcome::Failed(classify_failure(&error))
            }
        }
    }

    fn run(&self, question: &str) -> Result<ResolutionOutcome> {
        let retrieved = retrieve(question, self.embedder.as_ref(), &self.store, self.top_k)?;
        debug!("Local retrieval produced {} passages", retrieved.len());

        let mut context =
            PromptContext::Local(retrieved.into_iter().map(|scored| scored.passage).collect());
        let mut generations = 0;

        loop {
            if generations >= self.max_generations {
                info!(
                    "Generation cap of {} reached without a terminal decision",
                    self.max_generations
                );
                return Ok(ResolutionOutcome::Unresolved(UnresolvedReason::LoopBound));
            }

            let message = compose(question, &context);
            let reply = self.generator.generate(&message)?;
            generations += 1;
            debug!("Generation {} produced {} chars", generations, reply.len());

            match route(&reply, question) {
                RouterDecision::Answer(text) => {
                    info!("Question answered after {} generation(s)", generations);
                    return Ok(ResolutionOutcome::Answered(text));
                }
                RouterDecision::NeedsWebSearch(query) => {
                    let Some(web_search) = self.web_search.as_ref() else {
                        warn!("Web search needed but no capability is configured");
                        return Ok(ResolutionOutcome::Failed(FailureKind::Configuration));
                    };

                    let results = web_search.search(&query)?;
                    info!("Web search returned {} results", results.len());
                    context = PromptContext::Web(results);
                }
            }
        }
    }
}

fn classify_failure(error: &AssistantError) -> FailureKind {
    match error {
        AssistantError::Config(_) => FailureKind::Configuration,
        AssistantError::InvalidInput(_) => FailureKind::InvalidInput,
        _ => FailureKind::ExternalService,
    }
}

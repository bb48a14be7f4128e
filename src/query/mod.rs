//! Query-resolution pipeline
//!
//! Turns a user question into a ranked set of locally indexed passages, a
//! context-conditioned prompt, and a model-generated answer. When the model
//! signals insufficient context, the answer is retried against web search
//! results.

pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod router;

use crate::Result;
use crate::store::Passage;

pub use pipeline::{
    FailureKind, QueryPipeline, QueryPipelineBuilder, ResolutionOutcome, UnresolvedReason,
};
pub use prompt::{ChatMessage, NO_ANSWER_SENTINEL, PromptContext, compose};
pub use retriever::{RetrievalResult, retrieve};
pub use router::{RouterDecision, route};

/// Maps a text string to a fixed-length vector. Must use the same model
/// identity the passage store was indexed with.
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// One language-model invocation: a composed message in, one free-text reply
/// out. The reply may legitimately contain the `NO_ANSWER` sentinel.
pub trait Generator {
    fn generate(&self, message: &ChatMessage) -> Result<String>;
}

/// Live web search capability; results carry their source URL and no
/// similarity score.
pub trait WebSearch {
    fn search(&self, query: &str) -> Result<Vec<Passage>>;
}

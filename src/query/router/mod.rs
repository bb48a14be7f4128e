
use tracing::debug;

use super::prompt::NO_ANSWER_SENTINEL;

/// Terminal decision for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterDecision {
    /// The reply is the final answer.
    Answer(String),
    /// The reply signalled insufficient context; carries the original query
    /// forward to the web search fallback.
    NeedsWebSearch(String),
}

/// Inspect a generator reply for the sentinel and decide the route.
///
/// Line breaks are removed before the substring test, so a sentinel split
/// across lines still matches. The match is case-sensitive by design; this
/// is a deliberately simple deterministic string test rather than structured
/// output.
#[inline]
pub fn route(reply: &str, query: &str) -> RouterDecision {
    let normalized: String = reply.chars().filter(|c| *c != '\n' && *c != '\r').collect();

    if normalized.contains(NO_ANSWER_SENTINEL) {
        debug!("Reply contains sentinel, routing to web search");
        RouterDecision::NeedsWebSearch(query.to_string())
    } else {
        debug!("Reply accepted as answer");
        RouterDecision::Answer(reply.to_string())
    }
}

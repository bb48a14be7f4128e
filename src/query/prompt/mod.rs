#[cfg(test)]
mod tests;

use std::fmt::Write;

use crate::store::Passage;

/// Literal marker the generator is instructed to emit when its context is
/// insufficient. The router matches it case-sensitively; changing the
/// spelling here changes routing behavior.
pub const NO_ANSWER_SENTINEL: &str = "NO_ANSWER";

/// Context supplied to one generation call. Exactly one variant is populated;
/// the variant selects the instruction template.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptContext {
    /// Passages drawn from the pre-built indexed store.
    Local(Vec<Passage>),
    /// Passages drawn from a live web search, used only as fallback.
    Web(Vec<Passage>),
}

/// A single model-input message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

impl ChatMessage {
    #[inline]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Render the instruction template for `context` into a single user message.
///
/// Rendering is pure and total: every document is interpolated in order and
/// identical inputs produce byte-identical output. Callers must reject empty
/// queries before reaching this function.
#[inline]
pub fn compose(query: &str, context: &PromptContext) -> ChatMessage {
    let content = match context {
        PromptContext::Local(documents) => render_local(query, documents),
        PromptContext::Web(documents) => render_web(query, documents),
    };
    ChatMessage::user(content)
}

fn render_local(query: &str, documents: &[Passage]) -> String {
    let mut out = String::new();

    out.push_str(
        "You are an AI assistant for answering detailed technical questions about \
         libraries like Pandas, NumPy, TensorFlow, PyTorch, LangChain, and Haystack.\n\n",
    );
    let _ = writeln!(out, "Here is the user's question:\n\"{}\"\n", query);
    out.push_str("Below are documents retrieved from the internal documentation.\n\n");

    out.push_str("Documents:\n");
    for document in documents {
        out.push_str("---\n");
        out.push_str(&document.content);
        out.push('\n');
    }

    out.push_str("\nInstructions:\n");
    out.push_str(
        "- If the question includes code or syntax, return a working Python example \
         and an explanation of how and when to use it.\n",
    );
    out.push_str("- Otherwise, answer clearly and directly.\n");
    let _ = writeln!(
        out,
        "- Do not guess or invent answers. Say {} if unsure.",
        NO_ANSWER_SENTINEL
    );

    out
}

fn render_web(query: &str, documents: &[Passage]) -> String {
    let mut out = String::new();

    out.push_str(
        "You are an expert AI assistant focused on technical questions about Python \
         libraries such as Pandas, NumPy, TensorFlow, PyTorch, LangChain, and Haystack.\n\n",
    );
    let _ = writeln!(out, "A user has asked the following question:\n\"{}\"\n", query);
    out.push_str("You are given web-retrieved documents that may help.\n\n");

    out.push_str("Instructions:\n");
    out.push_str(
        "- If the question is code-related, provide a short but functional Python \
         snippet and a step-by-step explanation of how it works.\n",
    );
    out.push_str("- Otherwise, provide a clear, accurate technical answer.\n");
    out.push_str("- Use only the content in the documents.\n");
    out.push_str("- If useful, include source links from the documents.\n");
    let _ = writeln!(
        out,
        "- If there is not enough context, respond with {}.",
        NO_ANSWER_SENTINEL
    );

    out.push_str("\nWeb context:\n");
    for document in documents {
        out.push_str("---\n");
        let _ = writeln!(out, "URL: {}", document.source);
        out.push_str(&document.content);
        out.push('\n');
    }

    out
}

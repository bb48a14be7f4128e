
use tracing::debug;

/// Split text into overlapping word windows.
///
/// Each chunk holds at most `length` words; consecutive chunks share
/// `overlap` words. `overlap` must be smaller than `length` (enforced by
/// config validation) or the window would never advance.
#[inline]
pub fn split_words(text: &str, length: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || length == 0 {
        return Vec::new();
    }

    let step = length.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + length).min(words.len());
        chunks.push(words[start..end].join(" "));

        if end == words.len() {
            break;
        }
        start += step;
    }

    debug!(
        "Split {} words into {} chunks (length {}, overlap {})",
        words.len(),
        chunks.len(),
        length,
        overlap
    );
    chunks
}

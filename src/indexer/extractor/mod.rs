
use anyhow::{Result, anyhow};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// HTML elements whose text is treated as page content. Navigation, script,
/// and style chrome is ignored by omission.
const CONTENT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li, pre, td, blockquote";

/// Extract readable text from an HTML page.
///
/// Returns the cleaned text of content-bearing elements in document order,
/// one block per line. Elements nested inside another content element (a
/// `<p>` inside a `<li>`, say) are covered by their ancestor's text and
/// skipped, so nested markup is never extracted twice. Empty output is valid
/// for pages with no recognizable content.
#[inline]
pub fn extract_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(CONTENT_SELECTOR)
        .map_err(|e| anyhow!("Invalid content selector: {}", e))?;

    let text = document
        .select(&selector)
        .filter(|element| !has_matching_ancestor(element, &selector))
        .filter_map(|element| {
            let block = clean_block(&element.text().collect::<String>());
            if block.is_empty() { None } else { Some(block) }
        })
        .join("\n");

    debug!("Extracted {} chars of text", text.len());
    Ok(text)
}

fn has_matching_ancestor(element: &ElementRef, selector: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

/// Collapse all whitespace runs in a block to single spaces.
fn clean_block(raw: &str) -> String {
    raw.split_whitespace().join(" ")
}

//! Selector Strategy
//!
//! Locates the fragments an extractor walks. A strategy is a primary CSS
//! selector plus an ordered list of fallbacks tried only when the primary
//! matches nothing, so alternate page layouts still produce records.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

use crate::dom;

pub mod rules;

/// Primary selector, ordered fallbacks, and an optional tag filter.
///
/// # Example
///
/// ```rust
/// use rs_fragments::selector::SelectorStrategy;
/// use rs_fragments::dom;
///
/// let page = dom::parse(r#"<div class="new-posts"><ul><li>a</li></ul></div>"#);
/// let strategy = SelectorStrategy::new_posts();
///
/// let found = strategy.locate(page.document());
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorStrategy {
    /// Selector tried first.
    pub primary: String,

    /// Selectors tried in order when `primary` matches nothing.
    pub fallbacks: Vec<String>,

    /// Keep only fallback matches with this tag name (case-insensitive).
    pub tag_filter: Option<String>,
}

impl SelectorStrategy {
    /// A strategy with a single selector and no fallbacks.
    #[must_use]
    pub fn single(selector: impl Into<String>) -> Self {
        Self {
            primary: selector.into(),
            fallbacks: Vec::new(),
            tag_filter: None,
        }
    }

    /// Post listing containers: `ul.new-post`, then looser layouts.
    #[must_use]
    pub fn new_posts() -> Self {
        Self {
            primary: "ul.new-post".to_string(),
            fallbacks: vec![
                ".new-posts ul".to_string(),
                r#"[class*="new-post"] ul"#.to_string(),
                r#"ul[class*="new"]"#.to_string(),
            ],
            tag_filter: Some("ul".to_string()),
        }
    }

    /// Run the strategy against a whole document.
    #[must_use]
    pub fn locate<'a>(&self, doc: &'a Document) -> Vec<Selection<'a>> {
        locate(
            doc,
            &self.primary,
            self.fallbacks.as_slice(),
            self.tag_filter.as_deref(),
        )
    }
}

impl Default for SelectorStrategy {
    fn default() -> Self {
        Self::single("article")
    }
}

/// Locate fragments in document order.
///
/// The primary selector wins whenever it matches. Otherwise the first fallback
/// whose matches survive `tag_filter` wins. No match at all is an empty vector,
/// not an error.
#[must_use]
pub fn locate<'a, S: AsRef<str>>(
    doc: &'a Document,
    primary: &str,
    fallbacks: &[S],
    tag_filter: Option<&str>,
) -> Vec<Selection<'a>> {
    let matches = dom::query_document(doc, primary);
    if !matches.is_empty() {
        return matches;
    }

    for selector in fallbacks {
        let selector = selector.as_ref();
        let matches: Vec<Selection<'a>> = dom::query_document(doc, selector)
            .into_iter()
            .filter(|sel| has_tag(sel, tag_filter))
            .collect();

        if !matches.is_empty() {
            tracing::debug!(selector, count = matches.len(), "fallback selector matched");
            return matches;
        }
    }

    Vec::new()
}

fn has_tag(sel: &Selection, tag_filter: Option<&str>) -> bool {
    match tag_filter {
        None => true,
        Some(wanted) => dom::tag_name(sel).is_some_and(|t| t.eq_ignore_ascii_case(wanted)),
    }
}

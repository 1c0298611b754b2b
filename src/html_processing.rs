//! Fragment sanitization.
//!
//! Non-content subtrees are stripped from every matched fragment before any
//! text or HTML is read from it.

use dom_query::Selection;

use crate::dom;

/// Elements whose whole subtree is dropped before extraction.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Selector form of [`NON_CONTENT_TAGS`].
const NON_CONTENT_SELECTOR: &str = "script,style";

/// Remove every `script` and `style` descendant of the fragment, in place.
///
/// Idempotent: a second pass finds nothing to remove.
pub fn sanitize(fragment: &Selection) {
    dom::remove_matching(fragment, NON_CONTENT_SELECTOR);
}

/// Whether the fragment still holds any non-content element.
#[must_use]
pub fn has_non_content(fragment: &Selection) -> bool {
    fragment.select(NON_CONTENT_SELECTOR).exists()
}

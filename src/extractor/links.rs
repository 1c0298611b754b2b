//! Link and image collection shared by the item-level extractors.

use dom_query::Selection;

use crate::dom;
use crate::options::LinkRewrite;
use crate::result::{ImageRef, LinkRef};

/// Rewrite an href with the first occurrence of each rule's `from`, in order.
#[must_use]
pub fn rewrite_href(href: &str, rules: &[LinkRewrite]) -> String {
    rules.iter().fold(href.to_string(), |acc, rule| {
        if rule.from.is_empty() {
            acc
        } else {
            acc.replacen(&rule.from, &rule.to, 1)
        }
    })
}

/// Every descendant anchor, in document order.
#[must_use]
pub fn collect_links(fragment: &Selection, rules: &[LinkRewrite]) -> Vec<LinkRef> {
    dom::query(fragment, "a")
        .iter()
        .map(|a| LinkRef {
            href: rewrite_href(&dom::attribute_or_empty(a, "href"), rules),
            text: dom::text_content(a),
        })
        .collect()
}

/// Every descendant image, in document order.
#[must_use]
pub fn collect_images(fragment: &Selection) -> Vec<ImageRef> {
    dom::query(fragment, "img")
        .iter()
        .map(|img| ImageRef {
            src: dom::attribute_or_empty(img, "src"),
            alt: dom::attribute_or_empty(img, "alt"),
        })
        .collect()
}

/// Trimmed text of the fragment with anchor subtrees left out.
///
/// Works on a clone so the fragment itself keeps its anchors for HTML
/// serialization.
#[must_use]
pub fn text_without_links(fragment: &Selection) -> String {
    let clone = dom::clone_subtree(fragment);
    let root = clone.root();
    dom::remove_matching(&root, "a");
    let text = dom::text_content(&root);
    clone.close();
    text
}

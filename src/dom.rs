//! DOM Operations Adapter
//!
//! A thin capability layer over the `dom_query` crate. Every extractor goes
//! through these functions, so the concrete parsing library stays swappable.
//!
//! Parsed documents are owned by a [`Page`]. Selections borrow the page, which
//! keeps a fragment from outliving the extraction call that produced it.

use std::collections::{BTreeMap, BTreeSet};

// Re-export core types for external use
pub use dom_query::{Document, Matcher, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Parsed Pages ===

/// A parsed HTML document scoped to one extraction call.
///
/// The backing document is owned by the page and released when the page is
/// closed or goes out of scope, so early returns and `?` still free it.
pub struct Page {
    doc: Document,
    fragment: bool,
}

impl Page {
    /// Borrow the underlying document.
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Select from the whole document.
    ///
    /// An invalid selector selects nothing.
    #[must_use]
    pub fn select(&self, selector: &str) -> Selection<'_> {
        self.doc.try_select(selector).unwrap_or_default()
    }

    /// First element under `<body>`.
    ///
    /// For a page produced by [`clone_subtree`] this is the cloned element.
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        if self.fragment {
            return first_node(&self.doc.select("html > *"));
        }
        let body_children = self.doc.select("body > *");
        body_children
            .nodes()
            .first()
            .map_or_else(|| self.doc.select("body"), |node| Selection::from(*node))
    }

    /// Release the backing document.
    #[inline]
    pub fn close(self) {
        tracing::trace!(fragment = self.fragment, "closing parsed page");
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").finish_non_exhaustive()
    }
}

/// Parse HTML string into a page.
///
/// html5ever recovers from malformed markup instead of failing, so this never
/// errors; an unparseable input simply yields an empty body.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Page {
    Page {
        doc: Document::from(html),
        fragment: false,
    }
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute value, or the empty string when it is absent.
#[inline]
#[must_use]
pub fn attribute_or_empty(sel: &Selection, name: &str) -> String {
    get_attribute(sel, name).unwrap_or_default()
}

/// All attributes of the first node in the selection.
///
/// Returns an empty map if the node has no attributes or the selection is empty.
#[must_use]
pub fn attributes_of(sel: &Selection) -> BTreeMap<String, String> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Lower-cased tag names of every descendant element, deduplicated.
#[must_use]
pub fn descendant_tags(sel: &Selection) -> BTreeSet<String> {
    sel.select("*")
        .nodes()
        .iter()
        .filter_map(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
        .collect()
}

// === Text Content ===

/// Trimmed text content of node and descendants
#[must_use]
pub fn text_content(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// Trimmed inner HTML content
#[must_use]
pub fn inner_html(sel: &Selection) -> String {
    sel.inner_html().trim().to_string()
}

/// Outer HTML content
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Querying ===

/// Whether `selector` parses as CSS.
#[must_use]
pub fn is_valid_selector(selector: &str) -> bool {
    Matcher::new(selector).is_ok()
}

/// Query all descendants matching a CSS selector, one selection per element,
/// in document order. An invalid selector matches nothing.
#[must_use]
pub fn query<'a>(sel: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    sel.try_select(selector)
        .map(|found| split(&found))
        .unwrap_or_default()
}

/// Query the whole document. An invalid selector matches nothing.
#[must_use]
pub fn query_document<'a>(doc: &'a Document, selector: &str) -> Vec<Selection<'a>> {
    doc.try_select(selector)
        .map(|found| split(&found))
        .unwrap_or_default()
}

/// Break a multi-node selection into single-node selections.
#[must_use]
pub fn split<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

fn first_node<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.nodes()
        .first()
        .map(|node| Selection::from(*node))
        .unwrap_or_default()
}

// === Tree Manipulation ===

/// Remove every descendant matching `selector`, in place.
#[inline]
pub fn remove_matching(sel: &Selection, selector: &str) {
    if let Some(found) = sel.try_select(selector) {
        found.remove();
    }
}

/// Deep-copy an element into its own page.
///
/// The copy is node for node, so elements that are only valid inside a
/// particular parent (`td`, `tr`, `option`) survive. Mutations to the clone
/// never reach the original document. Use [`Page::root`] to get at the cloned
/// element.
#[must_use]
pub fn clone_subtree(sel: &Selection) -> Page {
    match sel.nodes().first() {
        Some(node) => Page {
            doc: node.to_fragment(),
            fragment: true,
        },
        None => parse(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_select() {
        let page = parse(r#"<div id="main" class="container">content</div>"#);
        let div = page.select("div");

        assert_eq!(get_attribute(&div, "id"), Some("main".to_string()));
        assert_eq!(get_attribute(&div, "class"), Some("container".to_string()));
    }

    #[test]
    fn test_remove_matching() {
        let page = parse(r#"<div><span class="ad">ad</span><p>content</p></div>"#);
        let div = page.select("div");

        remove_matching(&div, ".ad");

        assert!(page.select(".ad").is_empty());
        assert!(!page.select("p").is_empty());
    }

    #[test]
    fn test_attributes_of() {
        let page = parse(r##"<a href="http://example.com" class="link" title="Example">Link</a>"##);
        let a = page.select("a");

        let attrs = attributes_of(&a);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("href").map(String::as_str), Some("http://example.com"));
        assert_eq!(attrs.get("class").map(String::as_str), Some("link"));
        assert_eq!(attrs.get("title").map(String::as_str), Some("Example"));
    }

    #[test]
    fn test_attributes_of_empty() {
        let page = parse("<div>No attributes</div>");
        assert!(attributes_of(&page.select("div")).is_empty());
        assert!(attributes_of(&page.select("span")).is_empty());
    }

    #[test]
    fn test_attribute_or_empty() {
        let page = parse(r#"<img src="x.jpg">"#);
        let img = page.select("img");

        assert_eq!(attribute_or_empty(&img, "src"), "x.jpg");
        assert_eq!(attribute_or_empty(&img, "alt"), "");
    }

    #[test]
    fn test_tag_name() {
        let page = parse(r#"<article><section>content</section></article>"#);

        assert_eq!(tag_name(&page.select("article")), Some("article".to_string()));
        assert_eq!(tag_name(&page.select("section")), Some("section".to_string()));
        assert_eq!(tag_name(&page.select("aside")), None);
    }

    #[test]
    fn test_descendant_tags_deduplicated() {
        let page = parse(r#"<ul><li><a href="/1">1</a></li><li><a href="/2">2</a><IMG src="x"></li></ul>"#);
        let tags = descendant_tags(&page.select("ul"));

        let expected: BTreeSet<String> =
            ["li", "a", "img"].iter().map(ToString::to_string).collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_text_and_html_are_trimmed() {
        let page = parse("<div>\n   text <span>nested</span> more  \n</div>");
        let div = page.select("div");

        assert_eq!(text_content(&div), "text nested more");
        assert!(inner_html(&div).starts_with("text"));
        assert!(inner_html(&div).contains("<span>nested</span>"));
        assert!(outer_html(&div).contains("<div>"));
    }

    #[test]
    fn test_query_document_order() {
        let page = parse(
            r#"
            <div id="container">
                <p class="text">First</p>
                <section><p class="text">Second</p></section>
                <p class="text">Third</p>
            </div>
        "#,
        );

        let container = page.select("#container");
        let ps = query(&container, "p");
        assert_eq!(ps.len(), 3);
        assert_eq!(text_content(&ps[0]), "First");
        assert_eq!(text_content(&ps[1]), "Second");
        assert_eq!(text_content(&ps[2]), "Third");

        assert_eq!(query_document(page.document(), "section").len(), 1);
    }

    #[test]
    fn test_operations_on_empty_selection() {
        let page = parse(r#"<div>content</div>"#);
        let empty = page.select("span");

        remove_matching(&empty, "b");

        assert_eq!(text_content(&empty), "");
        assert!(inner_html(&empty).is_empty());
        assert!(query(&empty, "a").is_empty());
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let page = parse(r#"<ul><li id="x">keep <a href="/a">link</a></li></ul>"#);
        let li = page.select("li");

        let clone = clone_subtree(&li);
        let root = clone.root();
        assert_eq!(tag_name(&root), Some("li".to_string()));

        remove_matching(&root, "a");
        assert_eq!(text_content(&root), "keep");

        // Original still has its anchor
        assert_eq!(page.select("li a").length(), 1);
        assert_eq!(text_content(&li), "keep link");
    }

    #[test]
    fn test_clone_subtree_keeps_table_cells() {
        let page = parse(r#"<table><tr><td class="c">hello <a href="/u/1">alice</a> world</td></tr></table>"#);
        let td = page.select("td");

        let clone = clone_subtree(&td);
        let root = clone.root();
        assert_eq!(tag_name(&root), Some("td".to_string()));
        assert_eq!(get_attribute(&root, "class"), Some("c".to_string()));

        remove_matching(&root, "a");
        assert_eq!(text_content(&root), "hello  world");
        assert_eq!(page.select("td a").length(), 1);
        clone.close();
    }

    #[test]
    fn test_clone_of_empty_selection() {
        let page = parse("<p>x</p>");
        let clone = clone_subtree(&page.select("span"));
        assert_eq!(text_content(&clone.root()), "");
    }

    #[test]
    fn test_invalid_selector_selects_nothing() {
        let page = parse(r#"<ul><li>a</li></ul>"#);
        let ul = page.select("ul");

        assert!(!is_valid_selector("ul[[["));
        assert!(is_valid_selector(r#"ul[class*="new"]"#));
        assert!(page.select("ul[[[").is_empty());
        assert!(query(&ul, "li[[[").is_empty());
        assert!(query_document(page.document(), "ul[[[").is_empty());

        remove_matching(&ul, "li[[[");
        assert_eq!(page.select("li").length(), 1);
    }

    #[test]
    fn test_close_releases_page() {
        let page = parse("<p>bye</p>");
        assert_eq!(text_content(&page.select("p")), "bye");
        page.close();
    }
}

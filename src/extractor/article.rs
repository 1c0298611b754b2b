//! Article Extraction
//!
//! Turns every `<article>` (or whatever the article strategy locates) into an
//! [`ArticleRecord`].

use dom_query::Selection;

use crate::dom::{self, Page};
use crate::html_processing::sanitize;
use crate::options::Options;
use crate::result::ArticleRecord;

/// Extract all articles of a page in document order.
#[must_use]
pub fn extract_articles(page: &Page, options: &Options) -> Vec<ArticleRecord> {
    let fragments = options.articles.locate(page.document());
    let records: Vec<ArticleRecord> = fragments
        .iter()
        .enumerate()
        .map(|(id, fragment)| article_record(id, fragment))
        .collect();

    tracing::debug!(count = records.len(), "extracted articles");
    records
}

/// Build one record. The fragment is sanitized in place first.
#[must_use]
pub fn article_record(id: usize, fragment: &Selection) -> ArticleRecord {
    sanitize(fragment);

    ArticleRecord {
        id,
        attributes: dom::attributes_of(fragment),
        html: dom::inner_html(fragment),
        text_content: dom::text_content(fragment),
        child_tags: dom::descendant_tags(fragment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_with_script_yields_clean_record() {
        let page = dom::parse(r#"<article id="a1"><script>x</script><p>Hello</p></article>"#);

        let records = extract_articles(&page, &Options::default());
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 0);
        assert_eq!(record.html, "<p>Hello</p>");
        assert_eq!(record.text_content, "Hello");
        assert_eq!(record.attributes.get("id").map(String::as_str), Some("a1"));
        assert!(record.child_tags.contains("p"));
        assert!(!record.child_tags.contains("script"));
    }

    #[test]
    fn articles_are_numbered_in_document_order() {
        let page = dom::parse(
            r#"<main><article class="first">one</article><section><article>two</article></section></main>"#,
        );

        let records = extract_articles(&page, &Options::default());
        let ids: Vec<usize> = records.iter().map(|r| r.id).collect();
        let texts: Vec<&str> = records.iter().map(|r| r.text_content.as_str()).collect();

        assert_eq!(ids, vec![0, 1]);
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(records[0].attributes.get("class").map(String::as_str), Some("first"));
        assert!(records[1].attributes.is_empty());
    }

    #[test]
    fn article_text_includes_link_text() {
        let page = dom::parse(r#"<article>See <a href="/x">this</a> <style>a{}</style></article>"#);

        let records = extract_articles(&page, &Options::default());
        assert_eq!(records[0].text_content, "See this");
        assert!(!records[0].html.contains("style"));
    }

    #[test]
    fn page_without_articles_yields_nothing() {
        let page = dom::parse("<div><p>no article</p></div>");
        assert!(extract_articles(&page, &Options::default()).is_empty());
    }
}

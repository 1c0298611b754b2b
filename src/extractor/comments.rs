//! Comment Extraction
//!
//! Comment threads are `<li>` entries under a `ul#comments` container. Each
//! entry becomes a [`CommentRecord`]; the detail extractor instead takes the
//! whole container's sanitized HTML.

use dom_query::Selection;

use crate::dom::{self, Page};
use crate::html_processing::sanitize;
use crate::options::{LinkRewrite, Options};
use crate::result::CommentRecord;

use super::links::{collect_images, collect_links, text_without_links};

/// Extract every comment of every located thread container.
///
/// Ids run across containers in document order.
#[must_use]
pub fn extract_comments(page: &Page, options: &Options) -> Vec<CommentRecord> {
    let containers = options.comments.locate(page.document());

    let mut records = Vec::new();
    for container in &containers {
        sanitize(container);
        for item in dom::query(container, &options.comment_item_selector) {
            let id = records.len();
            records.push(comment_record(id, &item, &options.comment_link_rewrites));
        }
    }

    tracing::debug!(
        containers = containers.len(),
        count = records.len(),
        "extracted comments"
    );
    records
}

/// Build one comment record.
#[must_use]
pub fn comment_record(id: usize, item: &Selection, rewrites: &[LinkRewrite]) -> CommentRecord {
    sanitize(item);

    CommentRecord {
        id,
        text_content: text_without_links(item),
        links: collect_links(item, rewrites),
        images: collect_images(item),
        inner_html: dom::inner_html(item),
    }
}

/// Sanitized inner HTML of the first thread container, if there is one.
#[must_use]
pub fn comments_inner_html(page: &Page, options: &Options) -> Option<String> {
    let containers = options.comments.locate(page.document());
    let first = containers.first()?;
    sanitize(first);
    Some(dom::inner_html(first))
}

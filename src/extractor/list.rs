//! Post Listing Extraction
//!
//! Locates post listing containers with the list [`SelectorStrategy`] and
//! emits one [`ListPostRecord`] per container, each holding its `<li>` items.
//!
//! [`SelectorStrategy`]: crate::selector::SelectorStrategy

use dom_query::Selection;

use crate::dom::{self, Page};
use crate::html_processing::sanitize;
use crate::options::{LinkRewrite, Options};
use crate::result::{ListItemRecord, ListPostRecord};

use super::links::{collect_images, collect_links, text_without_links};

/// Extract all post listings of a page in document order.
#[must_use]
pub fn extract_list_posts(page: &Page, options: &Options) -> Vec<ListPostRecord> {
    let containers = options.list.locate(page.document());
    let records: Vec<ListPostRecord> = containers
        .iter()
        .enumerate()
        .map(|(id, container)| list_post_record(id, container, options))
        .collect();

    tracing::debug!(
        count = records.len(),
        items = records.iter().map(|r| r.items.len()).sum::<usize>(),
        "extracted post listings"
    );
    records
}

/// Build one listing record and all of its items.
#[must_use]
pub fn list_post_record(id: usize, container: &Selection, options: &Options) -> ListPostRecord {
    sanitize(container);

    let items = dom::query(container, &options.list_item_selector)
        .iter()
        .enumerate()
        .map(|(item_id, li)| list_item_record(item_id, li, &options.list_link_rewrites))
        .collect();

    ListPostRecord {
        id,
        attributes: dom::attributes_of(container),
        items,
        text_content: dom::text_content(container),
        child_tags: dom::descendant_tags(container),
        tag_name: dom::tag_name(container).unwrap_or_default(),
    }
}

/// Build one item record. Anchor text goes to `links`, not `text_content`.
#[must_use]
pub fn list_item_record(id: usize, item: &Selection, rewrites: &[LinkRewrite]) -> ListItemRecord {
    sanitize(item);

    ListItemRecord {
        id,
        attributes: dom::attributes_of(item),
        text_content: text_without_links(item),
        links: collect_links(item, rewrites),
        images: collect_images(item),
        inner_html: dom::inner_html(item),
    }
}

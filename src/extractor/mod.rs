//! Record extractors.
//!
//! Every extractor walks fragments located by a selector strategy and emits
//! one record per fragment. The shared steps, in order:
//!
//! 1. sanitize the fragment (`script`/`style` removed)
//! 2. read the root element's attributes
//! 3. collect anchors and images in document order
//! 4. compute text, excluding anchor text for item-level records
//! 5. serialize trimmed inner HTML
//! 6. collect descendant tag names
//! 7. number the record by its position
//!
//! # Module Structure
//!
//! - `article`: `<article>` fragments
//! - `list`: post listings and their items
//! - `comments`: comment threads
//! - `detail`: articles plus the linked discussion thread
//! - `links`: anchors, images, href rewriting, link-free text
//!
//! # Usage
//!
//! ```rust
//! use rs_fragments::{dom, extractor, Options};
//!
//! let page = dom::parse(r#"<article id="a1"><script>x</script><p>Hello</p></article>"#);
//! let records = extractor::extract_articles(&page, &Options::default());
//! page.close();
//!
//! assert_eq!(records[0].html, "<p>Hello</p>");
//! ```

pub mod article;
pub mod comments;
pub mod detail;
pub mod links;
pub mod list;

pub use article::extract_articles;
pub use comments::{comments_inner_html, extract_comments};
pub use detail::{fetch_linked_comments, scan_detail, DetailScan};
pub use list::extract_list_posts;

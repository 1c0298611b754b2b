//! # rs-fragments
//!
//! Fetches allow-listed HTML pages and normalizes the fragments that matter
//! (articles, post listings, comment threads) into stable JSON records.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_fragments::{list_posts, Options};
//!
//! let html = r#"<ul class="new-post">
//!     <li><a href="/douban-maizu/5.html">Title</a> 10:32</li>
//! </ul>"#;
//!
//! let posts = list_posts(html, &Options::default());
//! assert_eq!(posts[0].items[0].links[0].href, "/douban/detail/5.html");
//! assert_eq!(posts[0].items[0].text_content, "10:32");
//! ```
//!
//! ## Pipeline
//!
//! 1. **URL guard**: the source URL must be absolute and on the allow-list
//! 2. **Fetch**: one GET with a configured header profile
//! 3. **Parse**: the page is parsed into a scoped [`dom::Page`]
//! 4. **Locate**: a [`selector::SelectorStrategy`] finds fragments, trying fallbacks
//! 5. **Sanitize**: `script` and `style` subtrees are removed
//! 6. **Extract**: each fragment becomes a record
//! 7. **Assemble**: records are wrapped with source URL, fetch time and count
//!
//! Steps 3 to 7 are synchronous and available without any networking through
//! [`articles`], [`list_posts`] and [`comments`]. [`Scraper`] runs the whole
//! pipeline.

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Selector strategies and named id rules.
pub mod selector;

/// Fragment sanitization.
pub mod html_processing;

/// Record extractors (articles, listings, comments, detail pages).
pub mod extractor;

/// URL validation, allow-list, resolution and templating.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Upstream fetching.
pub mod fetch;

/// HTTP service exposing the pipelines.
#[cfg(feature = "server")]
pub mod server;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::Scraper;
pub use fetch::{Fetcher, SourcePage};
pub use options::{FetchProfile, LinkRewrite, Options, ServiceConfig, SESSION_COOKIE_ENV};
pub use result::{
    ArticleRecord, CommentRecord, CommentsPayload, DetailPayload, ImageRef, LinkRef,
    ListItemRecord, ListPostRecord, Record, ResponsePayload,
};
pub use url_utils::{resolve, AllowList};

/// Extracts article records from an HTML document.
///
/// # Example
///
/// ```rust
/// use rs_fragments::{articles, Options};
///
/// let html = r#"<article id="a1"><script>x</script><p>Hello</p></article>"#;
/// let records = articles(html, &Options::default());
/// assert_eq!(records[0].html, "<p>Hello</p>");
/// assert_eq!(records[0].text_content, "Hello");
/// ```
#[must_use]
pub fn articles(html: &str, options: &Options) -> Vec<ArticleRecord> {
    let page = dom::parse(html);
    let records = extractor::extract_articles(&page, options);
    page.close();
    records
}

/// Extracts post listing records from an HTML document.
#[must_use]
pub fn list_posts(html: &str, options: &Options) -> Vec<ListPostRecord> {
    let page = dom::parse(html);
    let records = extractor::extract_list_posts(&page, options);
    page.close();
    records
}

/// Extracts comment records from an HTML document.
#[must_use]
pub fn comments(html: &str, options: &Options) -> Vec<CommentRecord> {
    let page = dom::parse(html);
    let records = extractor::extract_comments(&page, options);
    page.close();
    records
}

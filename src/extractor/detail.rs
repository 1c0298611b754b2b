//! Detail Page Extraction
//!
//! A detail page is a set of articles plus an optional "copyright" marker
//! whose link points at the discussion thread. The link yields a topic id and,
//! when followed, the thread's comment list.
//!
//! Following the link is best effort: every failure on that path is logged
//! and turns into `None`.

use url::Url;

use crate::dom::{self, Page};
use crate::error::Error;
use crate::fetch::Fetcher;
use crate::options::Options;
use crate::result::ArticleRecord;
use crate::selector::rules::IdRule;
use crate::url_utils::{self, AllowList};

use super::article::extract_articles;
use super::comments::comments_inner_html;

/// What a detail page yields before any secondary fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailScan {
    pub articles: Vec<ArticleRecord>,

    /// `href` of the first anchor inside the copyright marker.
    pub discussion_link: Option<String>,

    /// Id captured from `discussion_link` by the topic rule.
    pub topic_id: Option<String>,
}

/// Extract articles and the discussion link from a parsed detail page.
#[must_use]
pub fn scan_detail(page: &Page, options: &Options, topic_rule: &IdRule) -> DetailScan {
    let articles = extract_articles(page, options);

    let marker = page.select(&options.copyright_selector);
    let discussion_link = dom::query(&marker, "a")
        .first()
        .and_then(|a| dom::get_attribute(a, "href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    let topic_id = discussion_link
        .as_deref()
        .and_then(|href| topic_rule.extract(href));

    tracing::debug!(
        articles = articles.len(),
        has_link = discussion_link.is_some(),
        topic_id = topic_id.as_deref().unwrap_or(""),
        "scanned detail page"
    );

    DetailScan {
        articles,
        discussion_link,
        topic_id,
    }
}

/// Follow the discussion link and return the sanitized comment list HTML.
///
/// Relative links resolve against `page_url`. When `allowed` is given the
/// target host must be on it. Never fails: unresolvable or disallowed links,
/// transport errors, error statuses and pages without a comment list all come
/// back as `None`.
pub async fn fetch_linked_comments(
    fetcher: &Fetcher,
    page_url: &str,
    link: &str,
    allowed: Option<&AllowList>,
    options: &Options,
) -> Option<String> {
    let target = match Url::parse(page_url)
        .ok()
        .and_then(|base| url_utils::create_absolute_url(link, &base))
    {
        Some(target) => target,
        None => {
            let err = Error::SecondaryFetch(format!("unresolvable discussion link `{link}`"));
            tracing::warn!(error = %err, "skipping linked comments");
            return None;
        }
    };

    if let Some(allowed) = allowed {
        let host = url_utils::host_with_port(&target);
        if !allowed.contains(&host) {
            let err = Error::SecondaryFetch(format!("host `{host}` is not allowed"));
            tracing::warn!(url = %target, error = %err, "skipping linked comments");
            return None;
        }
    }

    let source = match fetcher.fetch(target.as_str()).await {
        Ok(source) => source,
        Err(e) => {
            let err = Error::SecondaryFetch(e.to_string());
            tracing::warn!(url = %target, error = %err, "failed to fetch linked comments");
            return None;
        }
    };

    let page = dom::parse(&source.html);
    let html = comments_inner_html(&page, options);
    page.close();

    if html.is_none() {
        tracing::debug!(url = %target, "linked page has no comment list");
    }
    html
}

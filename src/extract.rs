//! Fetch-and-extract pipelines.
//!
//! Each pipeline validates its target URL, fetches once, parses, extracts and
//! assembles a payload. The parsed page is always closed before the next
//! await, so the only suspension points are the fetches themselves.

use chrono::Utc;

use crate::dom;
use crate::error::{Error, Result};
use crate::extractor;
use crate::fetch::{Fetcher, SourcePage};
use crate::options::ServiceConfig;
use crate::result::{
    ArticleRecord, CommentsPayload, DetailPayload, ListPostRecord, ResponsePayload,
};
use crate::selector::rules::IdRule;
use crate::url_utils::{self, AllowList};

/// Runs the extraction pipelines against allow-listed upstream pages.
///
/// Holds only read-only state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Scraper {
    config: ServiceConfig,
    fetcher: Fetcher,
    topic_rule: IdRule,
}

impl Scraper {
    /// Validate `config` and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is inconsistent or the
    /// header profile is not valid HTTP.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(&config.fetch, config.timeout())?;
        let topic_rule = config.extraction.topic_rule()?;
        Ok(Self {
            config,
            fetcher,
            topic_rule,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Articles of `url`, or of the default article page.
    ///
    /// # Errors
    ///
    /// URL validation errors, [`Error::Upstream`] and [`Error::Network`].
    pub async fn articles(&self, url: Option<&str>) -> Result<ResponsePayload<ArticleRecord>> {
        let url = self.resolve(url, &self.config.default_article_url, &self.config.allowed_hosts)?;
        let source = self.fetcher.fetch(&url).await?;

        let page = dom::parse(&source.html);
        let records = extractor::extract_articles(&page, &self.config.extraction);
        page.close();

        Ok(ResponsePayload::new(url, Utc::now(), records))
    }

    /// Post listings of `url`, or of the default listing page.
    ///
    /// # Errors
    ///
    /// URL validation errors, [`Error::Upstream`] and [`Error::Network`].
    pub async fn list(&self, url: Option<&str>) -> Result<ResponsePayload<ListPostRecord>> {
        let url = self.resolve(url, &self.config.default_list_url, &self.config.allowed_hosts)?;
        let source = self.fetcher.fetch(&url).await?;

        let page = dom::parse(&source.html);
        let records = extractor::extract_list_posts(&page, &self.config.extraction);
        page.close();

        Ok(ResponsePayload::new(url, Utc::now(), records))
    }

    /// A detail page and, best effort, its linked comment list.
    ///
    /// With an `id` the page URL comes from the detail template; without one
    /// `url` (or the default article page) is used.
    ///
    /// # Errors
    ///
    /// Errors of the primary fetch only. Failures following the discussion
    /// link leave `comments_list` empty instead.
    pub async fn detail(&self, id: Option<&str>, url: Option<&str>) -> Result<DetailPayload> {
        let url = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                let candidate = url_utils::fill_template(&self.config.detail_url_template, id);
                self.resolve(Some(&candidate), &candidate, &self.config.allowed_hosts)?
            }
            None => self.resolve(url, &self.config.default_article_url, &self.config.allowed_hosts)?,
        };
        let source = self.fetcher.fetch(&url).await?;

        let scan = {
            let page = dom::parse(&source.html);
            let scan = extractor::scan_detail(&page, &self.config.extraction, &self.topic_rule);
            page.close();
            scan
        };

        let comments_list = match scan.discussion_link.as_deref() {
            Some(link) if self.config.extraction.fetch_linked_comments => {
                extractor::fetch_linked_comments(
                    &self.fetcher,
                    &url,
                    link,
                    self.config.secondary_allowed_hosts.as_ref(),
                    &self.config.extraction,
                )
                .await
            }
            _ => None,
        };

        Ok(DetailPayload {
            payload: ResponsePayload::new(url, Utc::now(), scan.articles),
            topic_id: scan.topic_id,
            comments_list,
        })
    }

    /// Comments of the discussion topic `id`.
    ///
    /// # Errors
    ///
    /// A blank `id` is rejected as a client error; otherwise URL validation
    /// errors, [`Error::Upstream`] and [`Error::Network`].
    pub async fn comments(&self, id: &str) -> Result<CommentsPayload> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidUrl("id is required".to_string()));
        }
        let candidate = url_utils::fill_template(&self.config.comments_url_template, id);
        let url = self.resolve(Some(&candidate), &candidate, &self.config.comments_allowed_hosts)?;
        let SourcePage { html, .. } = self.fetcher.fetch(&url).await?;

        let page = dom::parse(&html);
        let comments = extractor::extract_comments(&page, &self.config.extraction);
        page.close();

        Ok(CommentsPayload::new(url, Utc::now(), comments))
    }

    fn resolve(&self, candidate: Option<&str>, default: &str, allowed: &AllowList) -> Result<String> {
        let resolved = url_utils::resolve(candidate, default, allowed);
        if let Err(err) = &resolved {
            tracing::debug!(candidate = candidate.unwrap_or(default), error = %err, "rejected source url");
        }
        resolved
    }
}

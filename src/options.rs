//! Configuration for extraction and for the service around it.
//!
//! [`Options`] controls where the extractors look and how links are rewritten.
//! [`ServiceConfig`] adds the allow-list, upstream URL templates and the
//! request header profile. Both load from TOML with every field optional.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dom;
use crate::error::{Error, Result};
use crate::patterns::TOPIC_ID_SOURCE;
use crate::selector::rules::IdRule;
use crate::selector::SelectorStrategy;
use crate::url_utils::{self, AllowList, ID_PLACEHOLDER};

/// Environment variable consulted for the upstream session cookie.
pub const SESSION_COOKIE_ENV: &str = "FRAGMENTS_SESSION_COOKIE";

/// A single href rewrite: the first occurrence of `from` becomes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRewrite {
    pub from: String,
    pub to: String,
}

impl LinkRewrite {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Configuration options for record extraction.
///
/// # Example
///
/// ```rust
/// use rs_fragments::{LinkRewrite, Options};
///
/// let options = Options {
///     list_link_rewrites: vec![LinkRewrite::new("/douban-maizu", "/douban/detail")],
///     ..Options::default()
/// };
/// assert_eq!(options.list.primary, "ul.new-post");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Where article fragments live.
    ///
    /// Default: `article`
    pub articles: SelectorStrategy,

    /// Where post listing containers live.
    ///
    /// Default: `ul.new-post`, falling back to `.new-posts ul`,
    /// `[class*="new-post"] ul` and `ul[class*="new"]`, keeping only `<ul>`.
    pub list: SelectorStrategy,

    /// Items inside a listing container.
    ///
    /// Default: `li`
    pub list_item_selector: String,

    /// Href rewrites applied to list item links, in order.
    ///
    /// Default: `/douban-maizu` → `/douban/detail`
    pub list_link_rewrites: Vec<LinkRewrite>,

    /// Href rewrites applied to comment links, in order.
    ///
    /// Default: none
    pub comment_link_rewrites: Vec<LinkRewrite>,

    /// Comment thread container.
    ///
    /// Default: `ul#comments`
    pub comments: SelectorStrategy,

    /// Comments inside the thread container.
    ///
    /// Default: `li`
    pub comment_item_selector: String,

    /// Marker holding the discussion link on detail pages.
    ///
    /// Default: `div.art-copyright`
    pub copyright_selector: String,

    /// Pattern pulling the topic id out of the discussion link. Must have one
    /// capture group.
    ///
    /// Default: `topic/(\d+)`
    pub topic_id_pattern: String,

    /// Follow the discussion link on detail pages and fold its comment list
    /// into the result.
    ///
    /// Default: `true`
    pub fetch_linked_comments: bool,
}

impl Options {
    /// Compile the topic id rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `topic_id_pattern` is not a valid regex
    /// with a capture group.
    pub fn topic_rule(&self) -> Result<IdRule> {
        if self.topic_id_pattern == TOPIC_ID_SOURCE {
            return Ok(IdRule::topic());
        }
        IdRule::new("topic", &self.topic_id_pattern)
    }

    /// Check that every selector parses and the topic rule compiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let strategies = [
            ("articles", &self.articles),
            ("list", &self.list),
            ("comments", &self.comments),
        ];
        for (name, strategy) in strategies {
            check_selector(&format!("{name}.primary"), &strategy.primary)?;
            for fallback in &strategy.fallbacks {
                check_selector(&format!("{name}.fallbacks"), fallback)?;
            }
            if let Some(tag) = &strategy.tag_filter {
                check_selector(&format!("{name}.tag_filter"), tag)?;
            }
        }
        check_selector("list_item_selector", &self.list_item_selector)?;
        check_selector("comment_item_selector", &self.comment_item_selector)?;
        check_selector("copyright_selector", &self.copyright_selector)?;
        self.topic_rule()?;
        Ok(())
    }
}

fn check_selector(name: &str, selector: &str) -> Result<()> {
    if dom::is_valid_selector(selector) {
        Ok(())
    } else {
        Err(Error::Config(format!("{name}: invalid selector `{selector}`")))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            articles: SelectorStrategy::single("article"),
            list: SelectorStrategy::new_posts(),
            list_item_selector: "li".to_string(),
            list_link_rewrites: vec![LinkRewrite::new("/douban-maizu", "/douban/detail")],
            comment_link_rewrites: Vec::new(),
            comments: SelectorStrategy::single("ul#comments"),
            comment_item_selector: "li".to_string(),
            copyright_selector: "div.art-copyright".to_string(),
            topic_id_pattern: TOPIC_ID_SOURCE.to_string(),
            fetch_linked_comments: true,
        }
    }
}

/// Request header profile sent with every upstream fetch.
///
/// No session cookie is set by default. Supply one through configuration or
/// [`SESSION_COOKIE_ENV`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchProfile {
    /// Default: a desktop Firefox user agent
    pub user_agent: String,

    /// Default: the browser navigation `Accept` header
    pub accept: String,

    /// Default: `zh-CN,zh;q=0.9,en;q=0.8`
    pub accept_language: String,

    /// Additional headers, e.g. `sec-fetch-*` negotiation headers.
    pub headers: BTreeMap<String, String>,

    /// Optional `Cookie` header value.
    pub session_cookie: Option<String>,
}

impl Default for FetchProfile {
    fn default() -> Self {
        let headers = [
            ("cache-control", "no-cache"),
            ("pragma", "no-cache"),
            ("sec-fetch-dest", "document"),
            ("sec-fetch-mode", "navigate"),
            ("sec-fetch-site", "none"),
            ("sec-fetch-user", "?1"),
            ("upgrade-insecure-requests", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:141.0) Gecko/20100101 Firefox/141.0"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            headers,
            session_cookie: None,
        }
    }
}

impl std::fmt::Debug for FetchProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchProfile")
            .field("user_agent", &self.user_agent)
            .field("accept", &self.accept)
            .field("accept_language", &self.accept_language)
            .field("headers", &self.headers)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Everything the HTTP service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket address the server binds to.
    ///
    /// Default: `127.0.0.1:3000`
    pub bind: String,

    /// Hosts permitted for `/articles`, `/list` and `/detail`.
    ///
    /// Default: `new.xianbao.fun`
    pub allowed_hosts: AllowList,

    /// Hosts permitted for `/comments`.
    ///
    /// Default: `www.douban.com`
    pub comments_allowed_hosts: AllowList,

    /// Hosts the detail pipeline may follow a discussion link to. `None`
    /// follows any absolute http(s) link.
    ///
    /// Default: `None`
    pub secondary_allowed_hosts: Option<AllowList>,

    /// Listing page used when `/list` gets no `url`.
    pub default_list_url: String,

    /// Article page used when `/articles` gets no `url`.
    pub default_article_url: String,

    /// Detail page URL with an `{id}` placeholder.
    pub detail_url_template: String,

    /// Discussion page URL with an `{id}` placeholder.
    pub comments_url_template: String,

    /// Per-request timeout for upstream fetches, in seconds.
    ///
    /// Default: `15`
    pub timeout_secs: u64,

    pub fetch: FetchProfile,

    pub extraction: Options,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            allowed_hosts: AllowList::new(["new.xianbao.fun"]),
            comments_allowed_hosts: AllowList::new(["www.douban.com"]),
            secondary_allowed_hosts: None,
            default_list_url: "https://new.xianbao.fun/category-douban-maizu/".to_string(),
            default_article_url: "https://new.xianbao.fun/douban-maizu/5312613.html".to_string(),
            detail_url_template: "https://new.xianbao.fun/douban-maizu/{id}.html".to_string(),
            comments_url_template:
                "https://www.douban.com/doubanapp/dispatch?uri=/group/topic/{id}".to_string(),
            timeout_secs: 15,
            fetch: FetchProfile::default(),
            extraction: Options::default(),
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML or failed validation.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Fill the session cookie from [`SESSION_COOKIE_ENV`] when it is set and
    /// non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(cookie) = std::env::var(SESSION_COOKIE_ENV) {
            if !cookie.trim().is_empty() {
                self.fetch.session_cookie = Some(cookie.trim().to_string());
            }
        }
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_hosts.is_empty() {
            return Err(Error::Config("allowed_hosts must not be empty".into()));
        }
        if self.comments_allowed_hosts.is_empty() {
            return Err(Error::Config("comments_allowed_hosts must not be empty".into()));
        }
        if self.secondary_allowed_hosts.as_ref().is_some_and(AllowList::is_empty) {
            return Err(Error::Config("secondary_allowed_hosts must not be empty when set".into()));
        }
        for (name, template, allowed) in [
            ("detail_url_template", &self.detail_url_template, &self.allowed_hosts),
            ("comments_url_template", &self.comments_url_template, &self.comments_allowed_hosts),
        ] {
            if !template.contains(ID_PLACEHOLDER) {
                return Err(Error::Config(format!(
                    "{name} must contain {ID_PLACEHOLDER}"
                )));
            }
            let sample = url_utils::fill_template(template, "0");
            url_utils::resolve(Some(&sample), &sample, allowed)
                .map_err(|e| Error::Config(format!("{name}: {e}")))?;
        }
        for (name, url) in [
            ("default_list_url", &self.default_list_url),
            ("default_article_url", &self.default_article_url),
        ] {
            url_utils::resolve(Some(url), url, &self.allowed_hosts)
                .map_err(|e| Error::Config(format!("{name}: {e}")))?;
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".into()));
        }
        self.extraction.validate()
    }
}

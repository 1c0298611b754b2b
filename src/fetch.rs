//! Upstream page fetching.
//!
//! One GET per call with the configured header profile. There is no retry
//! and no redirect override; callers that want either wrap the fetcher.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE};
use reqwest::Client;

use crate::encoding;
use crate::error::{Error, Result};
use crate::options::FetchProfile;

/// Raw HTML of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    /// URL the page was requested from.
    pub url: String,

    /// Body decoded to UTF-8.
    pub html: String,
}

/// HTTP client bound to one header profile.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher that sends `profile` headers on every request and
    /// gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a header name or value is not valid HTTP,
    /// or the client cannot be built.
    pub fn new(profile: &FetchProfile, timeout: Duration) -> Result<Self> {
        let headers = header_map(profile)?;
        let client = Client::builder()
            .user_agent(profile.user_agent.as_str())
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// * [`Error::Upstream`] if the response status is not 2xx
    /// * [`Error::Network`] on transport failure or timeout
    pub async fn fetch(&self, url: &str) -> Result<SourcePage> {
        tracing::debug!(url, "fetching source");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "upstream returned error status");
            return Err(Error::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;
        let html = encoding::transcode_to_utf8(&body, content_type.as_deref());

        tracing::debug!(url, bytes = body.len(), "fetched source");
        Ok(SourcePage {
            url: url.to_string(),
            html,
        })
    }
}

/// Translate a profile into request headers. The cookie is marked sensitive
/// so it never shows up in debug output.
fn header_map(profile: &FetchProfile) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, header_value(&profile.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&profile.accept_language)?);

    for (name, value) in &profile.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("header name `{name}`: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    if let Some(cookie) = profile.session_cookie.as_deref().filter(|c| !c.is_empty()) {
        let mut value = header_value(cookie)?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::Config(format!("header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_headers_are_applied() {
        let profile = FetchProfile {
            session_cookie: Some("bid=abc".into()),
            ..FetchProfile::default()
        };
        let headers = header_map(&profile).unwrap_or_default();

        assert_eq!(headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()), Some("zh-CN,zh;q=0.9,en;q=0.8"));
        assert_eq!(headers.get("sec-fetch-mode").and_then(|v| v.to_str().ok()), Some("navigate"));
        assert!(headers.get(COOKIE).is_some_and(HeaderValue::is_sensitive));
    }

    #[test]
    fn no_cookie_header_without_session() {
        let headers = header_map(&FetchProfile::default()).unwrap_or_default();
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn invalid_header_is_config_error() {
        let mut profile = FetchProfile::default();
        profile.headers.insert("bad header".into(), "x".into());
        assert!(matches!(header_map(&profile), Err(Error::Config(_))));

        let profile = FetchProfile {
            accept: "line\nbreak".into(),
            ..FetchProfile::default()
        };
        assert!(matches!(
            Fetcher::new(&profile, Duration::from_secs(1)),
            Err(Error::Config(_))
        ));
    }
}

//! URL Utility Functions
//!
//! Validation of candidate source URLs against the host allow-list, relative
//! link resolution, and id interpolation into upstream URL templates.
//!
//! Nothing in this module touches the network.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Placeholder replaced by [`fill_template`].
pub const ID_PLACEHOLDER: &str = "{id}";

/// Fixed set of hosts permitted as fetch targets.
///
/// Entries are compared case-insensitively and may carry a `:port` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AllowList {
    hosts: BTreeSet<String>,
}

impl AllowList {
    /// Build an allow-list from host names.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Whether `host` (optionally `host:port`) is permitted.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(&host.to_ascii_lowercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for AllowList {
    fn from(hosts: Vec<String>) -> Self {
        Self::new(hosts)
    }
}

impl From<AllowList> for Vec<String> {
    fn from(list: AllowList) -> Self {
        list.hosts.into_iter().collect()
    }
}

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            let web_scheme = matches!(url.scheme(), "http" | "https");
            if web_scheme && url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Host of a parsed URL, with `:port` appended when it is not the scheme default.
#[must_use]
pub fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Validate a candidate source URL.
///
/// An absent candidate falls back to `default`. The result is the canonical
/// serialization of the parsed URL.
///
/// # Errors
///
/// * [`Error::InvalidUrl`] if the URL is not absolute or fails to parse
/// * [`Error::HostNotAllowed`] if its host is outside `allowed`
pub fn resolve(candidate: Option<&str>, default: &str, allowed: &AllowList) -> Result<String> {
    let candidate = candidate.unwrap_or(default);

    let (is_abs, parsed) = is_absolute_url(candidate);
    let url = match parsed {
        Some(url) if is_abs => url,
        _ => return Err(Error::InvalidUrl(candidate.to_string())),
    };

    let host = host_with_port(&url);
    if !allowed.contains(&host) {
        return Err(Error::HostNotAllowed(host));
    }

    Ok(url.to_string())
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Returns
/// * The absolute URL, or `None` if the reference cannot be resolved
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> Option<Url> {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return None;
    }

    let (is_abs, parsed) = is_absolute_url(url_str);
    if is_abs {
        return parsed;
    }

    base.join(url_str)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

/// Substitute a caller-supplied id into a URL template.
///
/// The id is percent-encoded so it cannot escape the template's path segment
/// or query value.
#[must_use]
pub fn fill_template(template: &str, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.trim().as_bytes()).collect();
    template.replace(ID_PLACEHOLDER, &encoded)
}

//! Named Extraction Rules
//!
//! Small regex rules that pull an identifier out of an attribute value. They
//! live next to the selector strategy so all "where to look" knowledge sits in
//! one place.

use regex::Regex;

use crate::error::{Error, Result};
use crate::patterns;

/// A named pattern whose first capture group is the identifier.
#[derive(Debug, Clone)]
pub struct IdRule {
    name: String,
    pattern: Regex,
}

impl IdRule {
    /// Compile a rule from a pattern source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the pattern does not compile or has no
    /// capture group.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("rule `{name}`: {e}")))?;
        if pattern.captures_len() < 2 {
            return Err(Error::Config(format!(
                "rule `{name}`: pattern needs a capture group"
            )));
        }
        Ok(Self { name, pattern })
    }

    /// The `topic/(\d+)` rule.
    #[must_use]
    pub fn topic() -> Self {
        Self {
            name: "topic".to_string(),
            pattern: patterns::TOPIC_ID.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First capture of the first match in `haystack`.
    #[must_use]
    pub fn extract(&self, haystack: &str) -> Option<String> {
        self.pattern
            .captures(haystack)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for IdRule {
    fn default() -> Self {
        Self::topic()
    }
}

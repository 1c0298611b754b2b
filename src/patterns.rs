//! Compiled regex patterns used during extraction.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Default source for the topic id rule.
pub const TOPIC_ID_SOURCE: &str = r"topic/(\d+)";

/// Numeric topic id embedded in a discussion link path, e.g. `/group/topic/123/`.
pub static TOPIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOPIC_ID_SOURCE).expect("TOPIC_ID regex"));

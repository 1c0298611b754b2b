//! Character encoding detection and transcoding of fetched bodies.
//!
//! Upstream pages are not always UTF-8. The charset is taken from the HTTP
//! `Content-Type` header when present, then from HTML meta tags, and the body
//! is converted to UTF-8 before parsing.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/;]+)"#).expect("valid regex")
});

/// Match the `charset=` parameter of a `Content-Type` value
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i);\s*charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// Detect character encoding of a response body.
///
/// Order of precedence:
/// 1. `charset` parameter of the `Content-Type` header
/// 2. `<meta charset>` or `<meta http-equiv="Content-Type">` in the first 1024 bytes
/// 3. UTF-8
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(header_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    meta_charset(&head_str)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Charset from `<meta charset>` or the `content` of an `http-equiv` meta tag.
fn meta_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Charset parameter of a `Content-Type` header value.
fn header_charset(content_type: &str) -> Option<String> {
    HEADER_CHARSET_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode a response body to a UTF-8 string.
///
/// Invalid sequences become U+FFFD instead of failing.
///
/// # Examples
///
/// ```
/// use rs_fragments::encoding::transcode_to_utf8;
///
/// let body = b"<html><body>Caf\xE9</body></html>";
/// let text = transcode_to_utf8(body, Some("text/html; charset=ISO-8859-1"));
/// assert!(text.contains("Café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins_over_meta() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>Test</body></html>"#;
        let encoding = detect_encoding(html, Some("text/html; charset=GBK"));
        assert_eq!(encoding.name(), "GBK");
    }

    #[test]
    fn header_without_charset_falls_through_to_meta() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        let encoding = detect_encoding(html, Some("text/html"));
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn detect_charset_from_http_equiv() {
        let html = br#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=gb2312"></head></html>"#;
        // encoding_rs maps gb2312 to GBK per WHATWG
        assert_eq!(detect_encoding(html, None).name(), "GBK");
    }

    #[test]
    fn unknown_label_defaults_to_utf8() {
        let html = br#"<meta charset="klingon">"#;
        assert_eq!(detect_encoding(html, Some("text/html; charset=nope")), UTF_8);
        assert_eq!(detect_encoding(b"<html></html>", None), UTF_8);
    }

    #[test]
    fn transcode_gbk_to_utf8() {
        // "中文" in GBK
        let html = b"<html><head><meta charset=\"gbk\"></head><body>\xD6\xD0\xCE\xC4</body></html>";
        assert!(transcode_to_utf8(html, None).contains("中文"));
    }

    #[test]
    fn handle_invalid_utf8_gracefully() {
        let html = b"<html><body>Test \xFF\xFE Invalid</body></html>";
        let result = transcode_to_utf8(html, None);
        assert!(result.contains("Test"));
        assert!(result.contains("Invalid"));
    }

    #[test]
    fn header_charset_parsing() {
        assert_eq!(header_charset("text/html; charset=UTF-8").as_deref(), Some("UTF-8"));
        assert_eq!(header_charset(r#"text/html;charset="gbk""#).as_deref(), Some("gbk"));
        assert_eq!(header_charset("text/html"), None);
    }

    #[test]
    fn meta_charset_parsing() {
        assert_eq!(meta_charset("<META CHARSET=\"UTF-8\">").as_deref(), Some("UTF-8"));
        assert_eq!(meta_charset("<meta charset=utf-8>").as_deref(), Some("utf-8"));
        assert_eq!(
            meta_charset(r#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#)
                .as_deref(),
            Some("ISO-8859-1")
        );
    }
}

//! Result types for extraction output.
//!
//! Every record is a fetch-time snapshot serialized with camelCase field
//! names. `id` fields are zero-based positions in document order and are not
//! stable across re-fetches.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// An anchor found inside a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    /// `href` attribute after rewrite rules, empty when absent.
    pub href: String,

    /// Trimmed anchor text.
    pub text: String,
}

/// An image found inside a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// `src` attribute, empty when absent.
    pub src: String,

    /// `alt` attribute, empty when absent.
    pub alt: String,
}

/// One `<article>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: usize,
    pub attributes: BTreeMap<String, String>,
    /// Sanitized, trimmed inner HTML.
    pub html: String,
    /// All descendant text, trimmed.
    pub text_content: String,
    pub child_tags: BTreeSet<String>,
}

/// One post listing container (usually a `<ul>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostRecord {
    pub id: usize,
    pub attributes: BTreeMap<String, String>,
    pub items: Vec<ListItemRecord>,
    pub text_content: String,
    pub child_tags: BTreeSet<String>,
    pub tag_name: String,
}

/// One `<li>` of a post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemRecord {
    pub id: usize,
    pub attributes: BTreeMap<String, String>,
    /// Text with anchor subtrees removed; link text lives in `links`.
    pub text_content: String,
    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
}

/// One `<li>` of a comment thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: usize,
    /// Text with anchor subtrees removed.
    pub text_content: String,
    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
}

/// Any extracted record, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Article(ArticleRecord),
    ListPost(ListPostRecord),
    ListItem(ListItemRecord),
    Comment(CommentRecord),
}

impl Record {
    /// Position of the record in its match sequence.
    #[must_use]
    pub fn id(&self) -> usize {
        match self {
            Self::Article(r) => r.id,
            Self::ListPost(r) => r.id,
            Self::ListItem(r) => r.id,
            Self::Comment(r) => r.id,
        }
    }
}

impl From<ArticleRecord> for Record {
    fn from(r: ArticleRecord) -> Self {
        Self::Article(r)
    }
}

impl From<ListPostRecord> for Record {
    fn from(r: ListPostRecord) -> Self {
        Self::ListPost(r)
    }
}

impl From<ListItemRecord> for Record {
    fn from(r: ListItemRecord) -> Self {
        Self::ListItem(r)
    }
}

impl From<CommentRecord> for Record {
    fn from(r: CommentRecord) -> Self {
        Self::Comment(r)
    }
}

/// Fetch time formatted as ISO-8601 in UTC with millisecond precision.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Records wrapped with their source and fetch metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload<R = Record> {
    pub source_url: String,
    pub fetched_at: String,
    pub count: usize,
    pub records: Vec<R>,
}

impl<R> ResponsePayload<R> {
    /// Assemble a payload; `count` always equals `records.len()`.
    #[must_use]
    pub fn new(source_url: impl Into<String>, fetched_at: DateTime<Utc>, records: Vec<R>) -> Self {
        Self {
            source_url: source_url.into(),
            fetched_at: timestamp(fetched_at),
            count: records.len(),
            records,
        }
    }

    /// Convert typed records into tagged [`Record`]s.
    #[must_use]
    pub fn into_tagged(self) -> ResponsePayload<Record>
    where
        R: Into<Record>,
    {
        ResponsePayload {
            source_url: self.source_url,
            fetched_at: self.fetched_at,
            count: self.count,
            records: self.records.into_iter().map(Into::into).collect(),
        }
    }
}

/// Article records of a detail page plus the optional discussion data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPayload {
    #[serde(flatten)]
    pub payload: ResponsePayload<ArticleRecord>,

    /// Identifier parsed from the copyright link, if any.
    pub topic_id: Option<String>,

    /// Sanitized inner HTML of the linked comment list. `None` when there is
    /// no link or the secondary fetch failed.
    pub comments_list: Option<String>,
}

/// Comments of one discussion topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPayload {
    pub source_url: String,
    pub fetched_at: String,
    pub comments_list: Vec<CommentRecord>,
    pub has_comments: bool,
}

impl CommentsPayload {
    #[must_use]
    pub fn new(
        source_url: impl Into<String>,
        fetched_at: DateTime<Utc>,
        comments_list: Vec<CommentRecord>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            fetched_at: timestamp(fetched_at),
            has_comments: !comments_list.is_empty(),
            comments_list,
        }
    }
}

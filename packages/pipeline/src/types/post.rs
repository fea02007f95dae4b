//! Raw scraped posts - the ephemeral input to one pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw post as produced by the remote scrape engine.
///
/// Lives only for the duration of one run: raw posts are partitioned,
/// registered in the idempotence ledger, and handed to structuring, but
/// never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    /// Permalink of the post itself, when the engine extracted one.
    pub url: Option<String>,

    /// The group/feed URL the post was scraped from. Partition key.
    pub source_url: Option<String>,

    /// Author display name or identifier.
    pub author: Option<String>,

    /// Free-form post text.
    pub content: String,

    /// Attached media and link previews.
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Engagement counters at scrape time.
    #[serde(default)]
    pub engagement: Engagement,

    /// When the engine scraped the post.
    pub scraped_at: DateTime<Utc>,
}

impl RawPost {
    /// Create a bare post with content only.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            url: None,
            source_url: None,
            author: None,
            content: content.into(),
            attachments: Vec::new(),
            engagement: Engagement::default(),
            scraped_at: Utc::now(),
        }
    }

    /// Set the post permalink.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the source/group URL.
    pub fn with_source(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(Attachment {
            url: url.into(),
            kind: None,
        });
        self
    }

    /// Set the scrape timestamp.
    pub fn with_scraped_at(mut self, scraped_at: DateTime<Utc>) -> Self {
        self.scraped_at = scraped_at;
        self
    }
}

/// An attachment on a raw post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    /// Attachment kind as reported by the engine ("photo", "link", ...).
    pub kind: Option<String>,
}

/// Engagement counters on a raw post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

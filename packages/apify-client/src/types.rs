use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for the facebook-groups post scraper actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupScraperInput {
    pub start_urls: Vec<StartUrl>,
    pub max_posts: u32,
    pub max_attachments: u32,
    pub scrape_comments: bool,
}

/// A single start URL entry in actor input.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

impl StartUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A single group post from the Apify dataset.
///
/// Every field except `text` is optional: the actor emits whatever it
/// managed to extract for each post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPost {
    pub url: Option<String>,
    pub facebook_url: Option<String>,
    /// The group the post was scraped from.
    pub group_url: Option<String>,
    #[serde(default)]
    pub text: String,
    pub user: Option<PostUser>,
    #[serde(default)]
    pub attachments: Vec<PostAttachment>,
    pub likes_count: Option<i64>,
    pub comments_count: Option<i64>,
    pub shares_count: Option<i64>,
    pub time: Option<DateTime<Utc>>,
}

/// Author information attached to a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostUser {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// An attachment (image, link preview, file) on a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAttachment {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub attachment_type: Option<String>,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    pub id: String,
    pub status: String,
    pub default_dataset_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

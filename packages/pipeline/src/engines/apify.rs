//! Apify-backed scrape engine.
//!
//! Adapts the platform client to the [`ScrapeEngine`] seam: builds actor
//! input from a [`ScrapeJobConfig`], and translates run metadata and
//! dataset items into pipeline types.

use async_trait::async_trait;
use chrono::Utc;

use apify_client::{ApifyClient, ApifyError, GroupPost, GroupScraperInput, StartUrl};

use crate::config::ScrapeJobConfig;
use crate::error::EngineError;
use crate::traits::engine::ScrapeEngine;
use crate::types::post::{Attachment, Engagement, RawPost};
use crate::types::run::RunStatus;

/// Remote scrape engine backed by the Apify platform.
pub struct ApifyEngine {
    client: ApifyClient,
}

impl ApifyEngine {
    pub fn new(token: String) -> Self {
        Self {
            client: ApifyClient::new(token),
        }
    }
}

#[async_trait]
impl ScrapeEngine for ApifyEngine {
    async fn start_run(&self, config: &ScrapeJobConfig) -> Result<String, EngineError> {
        let input = GroupScraperInput {
            start_urls: config.source_urls.iter().map(StartUrl::new).collect(),
            max_posts: config.max_posts,
            max_attachments: config.max_attachments,
            scrape_comments: config.include_comments,
        };
        let run = self.client.start_group_scrape(&input).await?;
        Ok(run.id)
    }

    async fn run_status(&self, run_id: &str) -> Result<RunStatus, EngineError> {
        let run = self.client.get_run(run_id).await?;
        Ok(RunStatus::from_engine(&run.status))
    }

    async fn fetch_results(&self, run_id: &str) -> Result<Vec<RawPost>, EngineError> {
        let posts: Vec<GroupPost> = self.client.get_run_results(run_id).await?;
        Ok(posts.into_iter().map(into_raw_post).collect())
    }

    async fn abort_run(&self, run_id: &str) -> Result<(), EngineError> {
        self.client.abort_run(run_id).await?;
        Ok(())
    }
}

impl From<ApifyError> for EngineError {
    fn from(e: ApifyError) -> Self {
        match e {
            ApifyError::Api { status, message } => EngineError::Api { status, message },
            ApifyError::RunFailed(status) => EngineError::Decode(format!(
                "unexpected terminal status from client: {status}"
            )),
            ApifyError::Http(e) => EngineError::Transport(Box::new(e)),
        }
    }
}

fn into_raw_post(post: GroupPost) -> RawPost {
    RawPost {
        url: post.url.or(post.facebook_url),
        source_url: post.group_url,
        author: post.user.and_then(|u| u.name.or(u.id)),
        content: post.text,
        attachments: post
            .attachments
            .into_iter()
            .filter_map(|a| {
                a.url.map(|url| Attachment {
                    url,
                    kind: a.attachment_type,
                })
            })
            .collect(),
        engagement: Engagement {
            likes: post.likes_count.unwrap_or(0),
            comments: post.comments_count.unwrap_or(0),
            shares: post.shares_count.unwrap_or(0),
        },
        scraped_at: post.time.unwrap_or_else(Utc::now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_post_mapping_prefers_url_over_facebook_url() {
        let post: GroupPost = serde_json::from_value(serde_json::json!({
            "url": "https://facebook.com/groups/1/posts/9",
            "facebookUrl": "https://facebook.com/other",
            "groupUrl": "https://facebook.com/groups/1",
            "text": "hello",
            "user": {"id": "77", "name": "Maria"},
            "attachments": [{"url": "https://cdn/a.jpg", "type": "photo"}],
            "likesCount": 3
        }))
        .unwrap();

        let raw = into_raw_post(post);
        assert_eq!(raw.url.as_deref(), Some("https://facebook.com/groups/1/posts/9"));
        assert_eq!(raw.source_url.as_deref(), Some("https://facebook.com/groups/1"));
        assert_eq!(raw.author.as_deref(), Some("Maria"));
        assert_eq!(raw.attachments.len(), 1);
        assert_eq!(raw.engagement.likes, 3);
        assert_eq!(raw.engagement.shares, 0);
    }
}

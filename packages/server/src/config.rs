//! Environment-based server configuration.

use anyhow::{Context, Result};

use pipeline::ScrapeJobConfig;

/// Server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub apify_token: String,
    pub structurer_url: String,
    pub structurer_api_key: Option<String>,
    pub mail_endpoint: String,
    pub mail_api_key: String,
    pub mail_from: String,
    /// Shared secret guarding the automatic trigger endpoints.
    pub trigger_secret: String,
    /// Default source URLs for the automatic trigger.
    pub source_urls: Vec<String>,
    pub max_posts: u32,
    pub digest_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: optional("PORT")
                .map(|p| p.parse())
                .transpose()
                .context("PORT must be a number")?
                .unwrap_or(8080),
            apify_token: required("APIFY_TOKEN")?,
            structurer_url: required("STRUCTURER_URL")?,
            structurer_api_key: optional("STRUCTURER_API_KEY"),
            mail_endpoint: optional("MAIL_ENDPOINT")
                .unwrap_or_else(|| "https://api.resend.com/emails".to_string()),
            mail_api_key: required("MAIL_API_KEY")?,
            mail_from: required("MAIL_FROM")?,
            trigger_secret: required("TRIGGER_SECRET")?,
            source_urls: required("SOURCE_URLS")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_posts: optional("MAX_POSTS")
                .map(|p| p.parse())
                .transpose()
                .context("MAX_POSTS must be a number")?
                .unwrap_or(50),
            digest_size: optional("DIGEST_SIZE")
                .map(|p| p.parse())
                .transpose()
                .context("DIGEST_SIZE must be a number")?
                .unwrap_or(5),
        })
    }

    /// The scrape job the automatic trigger runs.
    pub fn default_job(&self) -> ScrapeJobConfig {
        ScrapeJobConfig::new(self.source_urls.clone()).with_max_posts(self.max_posts)
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

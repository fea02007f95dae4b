//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API. Supports starting actor runs,
//! querying run status, aborting runs, and fetching dataset results.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::{ApifyClient, GroupScraperInput, StartUrl};
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! let input = GroupScraperInput {
//!     start_urls: vec![StartUrl::new("https://www.facebook.com/groups/123")],
//!     max_posts: 50,
//!     max_attachments: 3,
//!     scrape_comments: false,
//! };
//! let run = client.start_group_scrape(&input).await?;
//! let run = client.get_run(&run.id).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{ApiResponse, GroupPost, GroupScraperInput, PostAttachment, PostUser, RunData, StartUrl};

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/facebook-groups-scraper.
const FACEBOOK_GROUPS_SCRAPER: &str = "2chN8UQcH1CfxLRNE";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Start a group scrape run. Returns immediately with run metadata.
    pub async fn start_group_scrape(&self, input: &GroupScraperInput) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", BASE_URL, FACEBOOK_GROUPS_SCRAPER);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Fetch the current metadata for a run, without waiting.
    pub async fn get_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}", BASE_URL, run_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Abort a run. The platform keeps whatever dataset items the run
    /// produced before the abort.
    pub async fn abort_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}/abort", BASE_URL, run_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        tracing::info!(run_id, status = %api_resp.data.status, "Apify run abort requested");
        Ok(api_resp.data)
    }

    /// Fetch dataset items from a run, completed or not.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", BASE_URL, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Fetch the dataset items for a run by run id: looks up the run to get
    /// its default dataset, then fetches the items.
    pub async fn get_run_results<T: DeserializeOwned>(&self, run_id: &str) -> Result<Vec<T>> {
        let run = self.get_run(run_id).await?;
        let items = self.get_dataset_items(&run.default_dataset_id).await?;
        tracing::debug!(run_id, count = items.len(), "Fetched run dataset items");
        Ok(items)
    }
}

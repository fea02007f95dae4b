//! Pipeline configuration.

use std::time::Duration;

/// Configuration for one remote scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeJobConfig {
    /// Group/feed URLs to scrape. Also the partition set for results.
    pub source_urls: Vec<String>,

    /// Maximum posts the engine should produce per run.
    pub max_posts: u32,

    /// Maximum attachments the engine should keep per post.
    pub max_attachments: u32,

    /// Whether the engine should also scrape comment threads.
    pub include_comments: bool,
}

impl ScrapeJobConfig {
    /// Create a config for a set of source URLs.
    pub fn new(source_urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            source_urls: source_urls.into_iter().map(|s| s.into()).collect(),
            max_posts: 50,
            max_attachments: 3,
            include_comments: false,
        }
    }

    /// Set the per-run post cap.
    pub fn with_max_posts(mut self, max_posts: u32) -> Self {
        self.max_posts = max_posts;
        self
    }

    /// Set the per-post attachment cap.
    pub fn with_max_attachments(mut self, max_attachments: u32) -> Self {
        self.max_attachments = max_attachments;
        self
    }

    /// Enable comment scraping.
    pub fn with_comments(mut self) -> Self {
        self.include_comments = true;
        self
    }
}

/// Poll-loop bounds for the run controller.
///
/// The remote job is outside this system's control and may run arbitrarily
/// long; the watchdog cap gives callers a predictable upper bound of
/// roughly `watchdog_cap + poll_interval` plus one abort call.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Fixed sleep between status polls.
    pub poll_interval: Duration,

    /// Wall-clock cap on waiting for a terminal status.
    pub watchdog_cap: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            watchdog_cap: Duration::from_secs(60),
        }
    }
}

impl WatchdogConfig {
    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the watchdog cap.
    pub fn with_watchdog_cap(mut self, watchdog_cap: Duration) -> Self {
        self.watchdog_cap = watchdog_cap;
        self
    }
}

/// Coordinator policy knobs.
#[derive(Debug, Clone)]
pub struct CoordinatorPolicy {
    /// Process results collected after a timeout/abort as if the run had
    /// completed naturally. When false, collection still happens but the
    /// structuring stage is skipped for non-terminal runs.
    pub process_partial_results: bool,

    /// Permit generated surrogate identities on the structured-job upsert
    /// path. The raw-item ledger is always natural-key-only.
    pub allow_generated_identity: bool,

    /// Stamped on every persisted job as `processing_version`.
    pub processing_version: String,
}

impl Default for CoordinatorPolicy {
    fn default() -> Self {
        Self {
            process_partial_results: true,
            allow_generated_identity: true,
            processing_version: "v2".to_string(),
        }
    }
}

impl CoordinatorPolicy {
    /// Disable processing of partial (post-abort) results.
    pub fn natural_completion_only(mut self) -> Self {
        self.process_partial_results = false;
        self
    }

    /// Disallow surrogate identities on the upsert path.
    pub fn natural_identity_only(mut self) -> Self {
        self.allow_generated_identity = false;
        self
    }

    /// Set the processing version stamp.
    pub fn with_processing_version(mut self, version: impl Into<String>) -> Self {
        self.processing_version = version.into();
        self
    }
}

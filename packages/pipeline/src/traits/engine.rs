//! Remote scrape engine trait.

use async_trait::async_trait;

use crate::config::ScrapeJobConfig;
use crate::error::EngineError;
use crate::types::post::RawPost;
use crate::types::run::RunStatus;

/// The remote scrape engine collaborator.
///
/// Implementations wrap a specific platform (see `engines::apify`) and
/// translate its wire types into pipeline types. All operations act on an
/// engine-assigned run id.
#[async_trait]
pub trait ScrapeEngine: Send + Sync {
    /// Start a run. Returns the engine's run id without waiting.
    async fn start_run(&self, config: &ScrapeJobConfig) -> Result<String, EngineError>;

    /// Query the current status of a run.
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, EngineError>;

    /// Fetch whatever results the run has produced so far. Valid on
    /// running, finished, and aborted runs alike.
    async fn fetch_results(&self, run_id: &str) -> Result<Vec<RawPost>, EngineError>;

    /// Ask the engine to abort a run.
    async fn abort_run(&self, run_id: &str) -> Result<(), EngineError>;
}

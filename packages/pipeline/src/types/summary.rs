//! Run summary types.
//!
//! Callers always receive a structured summary with explicit counts rather
//! than a single pass/fail flag: partial success is the expected, common
//! outcome of a run.

use serde::{Deserialize, Serialize};

use super::run::RunStatus;

/// Which extraction pass produced the run's structured jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    /// The external structuring service handled the batch.
    AiService,
    /// The deterministic local extractor handled the batch.
    LocalFallback,
    /// No raw items, or partial-result processing disabled.
    Skipped,
}

/// Summary of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSummary {
    pub run_id: String,
    pub final_status: RunStatus,
    /// True when the watchdog acted before a terminal status was observed.
    pub timed_out: bool,

    /// All posts the engine produced, matching a requested source or not.
    pub total_posts: usize,
    /// Raw items newly registered in the idempotence ledger.
    pub saved: usize,
    /// Raw items already known by their natural key.
    pub duplicates: usize,
    /// Raw items dropped for lacking a resolvable natural identity.
    pub dropped: usize,

    pub per_source: Vec<SourceBreakdown>,
    pub job_extraction: JobExtraction,

    pub elapsed_ms: u64,
}

/// Per-source raw item accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub source_url: String,
    pub found: usize,
    pub saved: usize,
    pub duplicates: usize,
}

/// Outcome of the structuring stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExtraction {
    /// True when an extraction pass ran, on either path.
    pub success: bool,
    pub structured_jobs_found: usize,
    /// Jobs upserted (inserted or updated) into the store.
    pub saved_count: usize,
    pub processing_method: ProcessingMethod,
}

impl JobExtraction {
    /// The extraction stage did not run.
    pub fn skipped() -> Self {
        Self {
            success: false,
            structured_jobs_found: 0,
            saved_count: 0,
            processing_method: ProcessingMethod::Skipped,
        }
    }
}

/// Outcome of one digest distribution pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    pub subscribers_processed: usize,
    /// Subscribers skipped because they had nothing unseen.
    pub skipped: usize,
    pub digests_sent: usize,
    pub jobs_sent: usize,
    /// Subscribers whose send failed; their state was left untouched.
    pub failures: usize,
}

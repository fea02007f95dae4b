//! Scrape run lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a remote scrape run.
///
/// The engine reports free-form status strings; everything that is not a
/// known terminal status parses as `Running` so the watchdog stays in
/// control of loop exit. Status is monotonic: once terminal it never
/// transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed,
    Aborted,
}

impl RunStatus {
    /// Parse an engine status string. Transitional states ("READY",
    /// "ABORTING", unknown values) map to `Running`; the engine's own
    /// timeout maps to `Failed`.
    pub fn from_engine(status: &str) -> Self {
        match status {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" | "TIMED-OUT" => Self::Failed,
            "ABORTED" => Self::Aborted,
            _ => Self::Running,
        }
    }

    /// Whether this status ends the run lifecycle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// One remote scrape run as tracked by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRun {
    pub run_id: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeRun {
    /// A run that has just been started.
    pub fn started(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record an observed terminal status. Non-terminal statuses are
    /// ignored, and the first terminal status sticks: the lifecycle is
    /// monotonic and never transitions again.
    pub fn complete(&mut self, status: RunStatus) {
        if self.status.is_terminal() || !status.is_terminal() {
            return;
        }
        self.status = status;
        self.finished_at = Some(Utc::now());
    }
}

//! Digest subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A digest subscriber.
///
/// `sent_job_ids` is an append-only ordered set: entries are never removed
/// or reordered, and a job identity present here is never sent again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    /// Unique key.
    pub email: String,

    #[serde(default)]
    pub sent_job_ids: Vec<String>,

    pub last_sent_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// A fresh subscriber with no send history.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            sent_job_ids: Vec::new(),
            last_sent_at: None,
        }
    }

    /// Whether a job identity has already been sent to this subscriber.
    pub fn has_seen(&self, job_id: &str) -> bool {
        self.sent_job_ids.iter().any(|id| id == job_id)
    }
}

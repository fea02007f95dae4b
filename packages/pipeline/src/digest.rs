//! Subscriber digest engine.
//!
//! Runs independently of the scrape pipeline, off persisted jobs and
//! subscriber state. For each subscriber it takes the K most recent jobs
//! not yet in their send history; state is updated only after a successful
//! send, so a failed send can never make a job look already-sent. Each
//! subscriber is processed in isolation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::traits::mailer::DigestMailer;
use crate::traits::store::{JobStore, SubscriberStore};
use crate::types::summary::DigestReport;

/// How many recent jobs form the candidate pool per pass.
const POOL_LIMIT: usize = 500;

/// Dedup-aware digest distribution.
pub struct DigestEngine {
    jobs: Arc<dyn JobStore>,
    subscribers: Arc<dyn SubscriberStore>,
    mailer: Arc<dyn DigestMailer>,
}

impl DigestEngine {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        subscribers: Arc<dyn SubscriberStore>,
        mailer: Arc<dyn DigestMailer>,
    ) -> Self {
        Self {
            jobs,
            subscribers,
            mailer,
        }
    }

    /// Send at most `digest_size` unseen jobs to every subscriber.
    ///
    /// Store failures are the only fatal condition; a mail failure isolates
    /// that one subscriber and the pass continues.
    pub async fn run(&self, digest_size: usize) -> Result<DigestReport, PipelineError> {
        let started = std::time::Instant::now();
        let fatal = |source| PipelineError::Store {
            source,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        let pool = self.jobs.recent(POOL_LIMIT).await.map_err(fatal)?;
        let subscribers = self.subscribers.all().await.map_err(fatal)?;

        let mut report = DigestReport::default();
        for subscriber in subscribers {
            report.subscribers_processed += 1;

            let seen: HashSet<&str> = subscriber
                .sent_job_ids
                .iter()
                .map(String::as_str)
                .collect();
            let unseen: Vec<_> = pool
                .iter()
                .filter(|job| !seen.contains(job.post_url.as_str()))
                .take(digest_size)
                .cloned()
                .collect();

            if unseen.is_empty() {
                debug!(email = %subscriber.email, "Nothing unseen, skipping subscriber");
                report.skipped += 1;
                continue;
            }

            match self.mailer.send_digest(&subscriber.email, &unseen).await {
                Ok(()) => {
                    let ids: Vec<String> =
                        unseen.iter().map(|job| job.post_url.clone()).collect();
                    self.subscribers
                        .mark_sent(&subscriber.email, &ids, Utc::now())
                        .await
                        .map_err(fatal)?;
                    report.digests_sent += 1;
                    report.jobs_sent += ids.len();
                    debug!(email = %subscriber.email, count = ids.len(), "Digest sent");
                }
                Err(e) => {
                    warn!(email = %subscriber.email, error = %e, "Digest send failed, state untouched");
                    report.failures += 1;
                }
            }
        }

        info!(
            processed = report.subscribers_processed,
            sent = report.digests_sent,
            skipped = report.skipped,
            failures = report.failures,
            "Digest pass complete"
        );
        Ok(report)
    }
}

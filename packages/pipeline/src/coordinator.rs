//! Scrape pipeline coordinator.
//!
//! Wires one run end to end: start, bounded wait, collect, partition,
//! idempotent raw-item persistence, structuring (AI service with local
//! fallback), identity resolution, and job upserts. Only two conditions
//! abort an invocation: failing to start the run at all, and losing the
//! document store. Everything else degrades into summary counts.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::ai;
use crate::collector::{self, SourceBucket};
use crate::config::{CoordinatorPolicy, ScrapeJobConfig, WatchdogConfig};
use crate::controller::RunController;
use crate::error::{IdentityError, PipelineError, StoreError};
use crate::fallback::FallbackExtractor;
use crate::identity::{self, IdentityFields, IdentityPolicy};
use crate::registry::RunRegistry;
use crate::traits::engine::ScrapeEngine;
use crate::traits::store::{JobStore, RawPostStore};
use crate::traits::structurer::JobStructurer;
use crate::types::summary::{JobExtraction, ProcessingMethod, ScrapeSummary, SourceBreakdown};

/// Orchestrates one scrape-structure-persist run.
pub struct Coordinator {
    engine: Arc<dyn ScrapeEngine>,
    registry: Arc<RunRegistry>,
    controller: RunController,
    structurer: Arc<dyn JobStructurer>,
    raw_posts: Arc<dyn RawPostStore>,
    jobs: Arc<dyn JobStore>,
    fallback: FallbackExtractor,
    policy: CoordinatorPolicy,
}

impl Coordinator {
    pub fn new(
        engine: Arc<dyn ScrapeEngine>,
        registry: Arc<RunRegistry>,
        structurer: Arc<dyn JobStructurer>,
        raw_posts: Arc<dyn RawPostStore>,
        jobs: Arc<dyn JobStore>,
    ) -> Self {
        let controller =
            RunController::new(engine.clone(), registry.clone(), WatchdogConfig::default());
        Self {
            engine,
            registry,
            controller,
            structurer,
            raw_posts,
            jobs,
            fallback: FallbackExtractor::new(),
            policy: CoordinatorPolicy::default(),
        }
    }

    /// Replace the watchdog bounds.
    pub fn with_watchdog(mut self, config: WatchdogConfig) -> Self {
        self.controller = RunController::new(self.engine.clone(), self.registry.clone(), config);
        self
    }

    /// Replace the policy knobs.
    pub fn with_policy(mut self, policy: CoordinatorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The run controller, for abort endpoints and introspection.
    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    /// Run the full pipeline once.
    pub async fn orchestrate(&self, config: &ScrapeJobConfig) -> Result<ScrapeSummary, PipelineError> {
        let started = Instant::now();

        let mut run = self
            .controller
            .start(config)
            .await
            .map_err(|source| PipelineError::RunStart {
                source,
                elapsed_ms: started.elapsed().as_millis() as u64,
            })?;

        let outcome = self.controller.await_terminal(&mut run).await;
        let posts = collector::collect(self.engine.as_ref(), &run.run_id).await;
        let total_posts = posts.len();
        let buckets = collector::partition_by_source(&posts, &config.source_urls);

        let (per_source, raw_counts) = self.persist_raw(&buckets, started).await?;

        let job_extraction = if posts.is_empty() {
            JobExtraction::skipped()
        } else if !self.policy.process_partial_results && !outcome.final_status.is_terminal() {
            info!(run_id = %run.run_id, "Partial-result processing disabled, skipping structuring");
            JobExtraction::skipped()
        } else {
            self.structure_and_persist(&posts, started).await?
        };

        let summary = ScrapeSummary {
            run_id: run.run_id,
            final_status: outcome.final_status,
            timed_out: outcome.timed_out,
            total_posts,
            saved: raw_counts.saved,
            duplicates: raw_counts.duplicates,
            dropped: raw_counts.dropped,
            per_source,
            job_extraction,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            run_id = %summary.run_id,
            final_status = %summary.final_status,
            total = summary.total_posts,
            saved = summary.saved,
            duplicates = summary.duplicates,
            jobs_saved = summary.job_extraction.saved_count,
            elapsed_ms = summary.elapsed_ms,
            "Pipeline run complete"
        );
        Ok(summary)
    }

    /// Register raw items in the idempotence ledger, per source bucket.
    /// Items already known by their natural key count as duplicates; items
    /// with no natural key are dropped with a logged sample.
    async fn persist_raw(
        &self,
        buckets: &[SourceBucket],
        started: Instant,
    ) -> Result<(Vec<SourceBreakdown>, RawCounts), PipelineError> {
        let mut per_source = Vec::with_capacity(buckets.len());
        let mut totals = RawCounts::default();

        for bucket in buckets {
            let mut saved = 0usize;
            let mut duplicates = 0usize;

            for post in &bucket.posts {
                let fields = IdentityFields::from(post);
                let key = match identity::resolve(&fields, IdentityPolicy::NaturalOnly) {
                    Ok(key) => key,
                    Err(IdentityError::Unresolvable { sample }) => {
                        totals.dropped += 1;
                        warn!(sample = %sample, source = %bucket.source_url, "Dropping raw item with no natural key");
                        continue;
                    }
                };

                if self
                    .raw_posts
                    .known(&key)
                    .await
                    .map_err(|e| fatal_store(e, started))?
                {
                    duplicates += 1;
                    continue;
                }
                match self.raw_posts.record(&key).await {
                    Ok(()) => saved += 1,
                    Err(StoreError::DuplicateKey { .. }) => duplicates += 1,
                    Err(e) => return Err(fatal_store(e, started)),
                }
            }

            totals.saved += saved;
            totals.duplicates += duplicates;
            per_source.push(SourceBreakdown {
                source_url: bucket.source_url.clone(),
                found: bucket.posts.len(),
                saved,
                duplicates,
            });
        }

        Ok((per_source, totals))
    }

    /// Structure the batch (AI service, local fallback on failure) and
    /// upsert each resulting job under its resolved identity.
    async fn structure_and_persist(
        &self,
        posts: &[crate::types::post::RawPost],
        started: Instant,
    ) -> Result<JobExtraction, PipelineError> {
        let text = ai::render_posts(posts);

        let (drafts, method) = match self.structurer.filter_and_structure(&text).await {
            Ok(resp) if resp.success => (
                ai::parse_structured_jobs(resp.data.as_ref()),
                ProcessingMethod::AiService,
            ),
            Ok(resp) => {
                warn!(
                    error = resp.error.as_deref().unwrap_or("unspecified"),
                    "Structuring service reported failure, using local fallback"
                );
                (self.fallback.extract_jobs(posts), ProcessingMethod::LocalFallback)
            }
            Err(e) => {
                warn!(error = %e, "Structuring call failed, using local fallback");
                (self.fallback.extract_jobs(posts), ProcessingMethod::LocalFallback)
            }
        };

        let structured_jobs_found = drafts.len();
        let identity_policy = if self.policy.allow_generated_identity {
            IdentityPolicy::AllowGenerated
        } else {
            IdentityPolicy::NaturalOnly
        };
        let version = format!(
            "{}-{}",
            self.policy.processing_version,
            match method {
                ProcessingMethod::AiService => "ai",
                _ => "fallback",
            }
        );

        let mut saved_count = 0usize;
        for draft in drafts {
            let fields = IdentityFields::from(&draft);
            let key = match identity::resolve(&fields, identity_policy) {
                Ok(key) => key,
                Err(IdentityError::Unresolvable { sample }) => {
                    warn!(sample = %sample, "Dropping structured job with unresolvable identity");
                    continue;
                }
            };

            let job = draft.into_job(key, &version);
            match self.jobs.upsert(&job).await {
                Ok(outcome) => {
                    debug!(key = %job.post_url, ?outcome, "Job upserted");
                    saved_count += 1;
                }
                Err(StoreError::DuplicateKey { key }) => {
                    warn!(key = %key, "Duplicate key during upsert, skipping record");
                }
                Err(e) => return Err(fatal_store(e, started)),
            }
        }

        Ok(JobExtraction {
            success: true,
            structured_jobs_found,
            saved_count,
            processing_method: method,
        })
    }
}

#[derive(Default)]
struct RawCounts {
    saved: usize,
    duplicates: usize,
    dropped: usize,
}

fn fatal_store(source: StoreError, started: Instant) -> PipelineError {
    PipelineError::Store {
        source,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that drives the pipeline without a
//! real scrape engine, structuring service, store, or mail API. Mocks are
//! scripted up front and track their calls for assertions.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::config::ScrapeJobConfig;
use crate::error::{EngineError, MailError, StoreError, StructuringError};
use crate::traits::engine::ScrapeEngine;
use crate::traits::mailer::DigestMailer;
use crate::traits::store::{JobStore, UpsertOutcome};
use crate::traits::structurer::{JobStructurer, StructuringResponse};
use crate::types::job::StructuredJob;
use crate::types::post::RawPost;
use crate::types::run::RunStatus;
use crate::types::subscriber::Subscriber;

/// Record of a call made to the mock engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Start,
    Status,
    Fetch,
    Abort,
}

/// A scripted scrape engine.
///
/// Status polls consume the script in order; an exhausted script keeps
/// reporting `Running`, which is what a never-finishing remote run looks
/// like from here.
#[derive(Default)]
pub struct MockEngine {
    start_error: Mutex<Option<EngineError>>,
    statuses: Mutex<VecDeque<Result<RunStatus, EngineError>>>,
    results: Mutex<Vec<RawPost>>,
    fetch_error: Mutex<Option<EngineError>>,
    abort_results: Mutex<VecDeque<Result<(), EngineError>>>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script status polls as plain statuses.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into_iter().map(Ok).collect();
        self
    }

    /// Script status polls including transport errors.
    pub fn with_status_results(
        self,
        results: impl IntoIterator<Item = Result<RunStatus, EngineError>>,
    ) -> Self {
        *self.statuses.lock().unwrap() = results.into_iter().collect();
        self
    }

    /// Make `start_run` fail.
    pub fn with_start_error(self, error: EngineError) -> Self {
        *self.start_error.lock().unwrap() = Some(error);
        self
    }

    /// Set the posts `fetch_results` returns.
    pub fn with_results(self, posts: Vec<RawPost>) -> Self {
        *self.results.lock().unwrap() = posts;
        self
    }

    /// Make the next `fetch_results` call fail.
    pub fn with_fetch_error(self, error: EngineError) -> Self {
        *self.fetch_error.lock().unwrap() = Some(error);
        self
    }

    /// Script abort outcomes. An exhausted script succeeds.
    pub fn with_abort_results(
        self,
        results: impl IntoIterator<Item = Result<(), EngineError>>,
    ) -> Self {
        *self.abort_results.lock().unwrap() = results.into_iter().collect();
        self
    }

    /// Shared handle to the call log.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<EngineCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ScrapeEngine for MockEngine {
    async fn start_run(&self, _config: &ScrapeJobConfig) -> Result<String, EngineError> {
        self.calls.lock().unwrap().push(EngineCall::Start);
        if let Some(error) = self.start_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok("run-1".to_string())
    }

    async fn run_status(&self, _run_id: &str) -> Result<RunStatus, EngineError> {
        self.calls.lock().unwrap().push(EngineCall::Status);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RunStatus::Running))
    }

    async fn fetch_results(&self, _run_id: &str) -> Result<Vec<RawPost>, EngineError> {
        self.calls.lock().unwrap().push(EngineCall::Fetch);
        if let Some(error) = self.fetch_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.results.lock().unwrap().clone())
    }

    async fn abort_run(&self, _run_id: &str) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(EngineCall::Abort);
        self.abort_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// A scripted structuring service.
#[derive(Default)]
pub struct MockStructurer {
    responses: Mutex<VecDeque<Result<StructuringResponse, StructuringError>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockStructurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one response.
    pub fn with_response(self, response: StructuringResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Script one transport error.
    pub fn with_transport_error(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(StructuringError::Transport(message.into().into())));
        self
    }

    /// Texts the mock was called with.
    pub fn requests_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl JobStructurer for MockStructurer {
    async fn filter_and_structure(&self, text: &str) -> Result<StructuringResponse, StructuringError> {
        self.requests.lock().unwrap().push(text.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StructuringResponse::ok(serde_json::json!([]))))
    }
}

/// A job store that raises duplicate-key errors for chosen keys, to
/// exercise the race-skip path. Delegates everything else to an inner
/// in-memory map.
#[derive(Default)]
pub struct RacyJobStore {
    inner: crate::stores::MemoryStore,
    duplicate_keys: HashSet<String>,
}

impl RacyJobStore {
    pub fn new(duplicate_keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            inner: crate::stores::MemoryStore::new(),
            duplicate_keys: duplicate_keys.into_iter().map(|k| k.into()).collect(),
        }
    }

    pub fn job_count(&self) -> usize {
        self.inner.job_count()
    }
}

#[async_trait]
impl JobStore for RacyJobStore {
    async fn upsert(&self, job: &StructuredJob) -> Result<UpsertOutcome, StoreError> {
        if self.duplicate_keys.contains(&job.post_url) {
            return Err(StoreError::DuplicateKey {
                key: job.post_url.clone(),
            });
        }
        self.inner.upsert(job).await
    }

    async fn find(&self, post_url: &str) -> Result<Option<StructuredJob>, StoreError> {
        self.inner.find(post_url).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StructuredJob>, StoreError> {
        self.inner.recent(limit).await
    }

    async fn delete_many(&self, post_urls: &[String]) -> Result<usize, StoreError> {
        self.inner.delete_many(post_urls).await
    }
}

/// A mailer that records sends and fails for chosen addresses.
#[derive(Default)]
pub struct MockMailer {
    fail_for: HashSet<String>,
    sent: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to an address fail with a transport error.
    pub fn failing_for(mut self, email: impl Into<String>) -> Self {
        self.fail_for.insert(email.into());
        self
    }

    /// Recorded sends: (address, job identities).
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, Vec<String>)>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl DigestMailer for MockMailer {
    async fn send_digest(&self, email: &str, jobs: &[StructuredJob]) -> Result<(), MailError> {
        if self.fail_for.contains(email) {
            return Err(MailError::Transport("scripted send failure".into()));
        }
        self.sent.lock().unwrap().push((
            email.to_string(),
            jobs.iter().map(|j| j.post_url.clone()).collect(),
        ));
        Ok(())
    }
}

/// A store whose job operations fail as unavailable, for fatal-path tests.
pub struct UnavailableJobStore;

#[async_trait]
impl JobStore for UnavailableJobStore {
    async fn upsert(&self, _job: &StructuredJob) -> Result<UpsertOutcome, StoreError> {
        Err(StoreError::Unavailable("scripted outage".into()))
    }

    async fn find(&self, _post_url: &str) -> Result<Option<StructuredJob>, StoreError> {
        Err(StoreError::Unavailable("scripted outage".into()))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<StructuredJob>, StoreError> {
        Err(StoreError::Unavailable("scripted outage".into()))
    }

    async fn delete_many(&self, _post_urls: &[String]) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("scripted outage".into()))
    }
}

/// Build a raw post with a permalink, source, and content.
pub fn sample_post(url: &str, source: &str, content: &str) -> RawPost {
    RawPost::new(content)
        .with_url(url)
        .with_source(source)
        .with_author("Sample Author")
}

/// Build a subscriber with an existing send history.
pub fn subscriber_with_history(
    email: &str,
    sent: impl IntoIterator<Item = impl Into<String>>,
    last_sent_at: Option<DateTime<Utc>>,
) -> Subscriber {
    Subscriber {
        email: email.to_string(),
        sent_job_ids: sent.into_iter().map(|s| s.into()).collect(),
        last_sent_at,
    }
}

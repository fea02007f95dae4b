//! Storage traits over the document store.
//!
//! The store is split into focused traits, one per collection:
//! - `RawPostStore`: the raw-item idempotence ledger
//! - `JobStore`: structured jobs keyed by `post_url`
//! - `SubscriberStore`: digest subscribers keyed by email
//!
//! Driver internals are out of scope here; implementations only need keyed
//! find/upsert/delete semantics. Upsert is commutative per key, which is
//! what makes concurrent pipeline invocations safe without locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::types::job::StructuredJob;
use crate::types::subscriber::Subscriber;

/// Outcome of an upsert. Both variants are success outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Idempotence ledger for raw items, keyed by natural identity.
#[async_trait]
pub trait RawPostStore: Send + Sync {
    /// Whether an item with this natural key has been seen before.
    async fn known(&self, key: &str) -> Result<bool, StoreError>;

    /// Register a natural key. Registering a known key is a no-op.
    async fn record(&self, key: &str) -> Result<(), StoreError>;
}

/// Structured jobs, upserted by `post_url`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or update by `post_url`. Repeated application with the same
    /// key yields exactly one stored record.
    async fn upsert(&self, job: &StructuredJob) -> Result<UpsertOutcome, StoreError>;

    /// Get a job by its key.
    async fn find(&self, post_url: &str) -> Result<Option<StructuredJob>, StoreError>;

    /// Most recently extracted jobs first.
    async fn recent(&self, limit: usize) -> Result<Vec<StructuredJob>, StoreError>;

    /// Delete jobs by key. Returns how many were removed.
    async fn delete_many(&self, post_urls: &[String]) -> Result<usize, StoreError>;
}

/// Digest subscribers, keyed by email.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// All subscribers.
    async fn all(&self) -> Result<Vec<Subscriber>, StoreError>;

    /// Append newly sent job identities and stamp `last_sent_at`.
    ///
    /// Append-only: existing entries are never removed or reordered, and
    /// an identity already present is not appended again.
    async fn mark_sent(
        &self,
        email: &str,
        job_ids: &[String],
        sent_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

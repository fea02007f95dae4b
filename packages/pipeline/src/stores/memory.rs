//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::StoreError;
use crate::traits::store::{JobStore, RawPostStore, SubscriberStore, UpsertOutcome};
use crate::types::job::StructuredJob;
use crate::types::subscriber::Subscriber;

/// In-memory store backing all three collections.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    raw_keys: RwLock<HashSet<String>>,
    jobs: RwLock<HashMap<String, StructuredJob>>,
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.raw_keys.write().unwrap().clear();
        self.jobs.write().unwrap().clear();
        self.subscribers.write().unwrap().clear();
    }

    /// Number of registered raw-item keys.
    pub fn raw_key_count(&self) -> usize {
        self.raw_keys.read().unwrap().len()
    }

    /// Number of stored jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    /// Seed a raw-item key, as if a prior run had persisted it.
    pub fn seed_raw_key(&self, key: impl Into<String>) {
        self.raw_keys.write().unwrap().insert(key.into());
    }

    /// Add a subscriber.
    pub fn add_subscriber(&self, subscriber: Subscriber) {
        self.subscribers
            .write()
            .unwrap()
            .insert(subscriber.email.clone(), subscriber);
    }

    /// Get a subscriber by email.
    pub fn subscriber(&self, email: &str) -> Option<Subscriber> {
        self.subscribers.read().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl RawPostStore for MemoryStore {
    async fn known(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.raw_keys.read().unwrap().contains(key))
    }

    async fn record(&self, key: &str) -> Result<(), StoreError> {
        self.raw_keys.write().unwrap().insert(key.to_string());
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn upsert(&self, job: &StructuredJob) -> Result<UpsertOutcome, StoreError> {
        let mut jobs = self.jobs.write().unwrap();
        let outcome = if jobs.contains_key(&job.post_url) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        jobs.insert(job.post_url.clone(), job.clone());
        Ok(outcome)
    }

    async fn find(&self, post_url: &str) -> Result<Option<StructuredJob>, StoreError> {
        Ok(self.jobs.read().unwrap().get(post_url).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StructuredJob>, StoreError> {
        let mut jobs: Vec<StructuredJob> = self.jobs.read().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.extracted_at.cmp(&a.extracted_at));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn delete_many(&self, post_urls: &[String]) -> Result<usize, StoreError> {
        let mut jobs = self.jobs.write().unwrap();
        let before = jobs.len();
        for url in post_urls {
            jobs.remove(url);
        }
        Ok(before - jobs.len())
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Subscriber>, StoreError> {
        Ok(self.subscribers.read().unwrap().values().cloned().collect())
    }

    async fn mark_sent(
        &self,
        email: &str,
        job_ids: &[String],
        sent_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut subscribers = self.subscribers.write().unwrap();
        if let Some(subscriber) = subscribers.get_mut(email) {
            for id in job_ids {
                if !subscriber.sent_job_ids.contains(id) {
                    subscriber.sent_job_ids.push(id.clone());
                }
            }
            subscriber.last_sent_at = Some(sent_at);
        }
        Ok(())
    }
}

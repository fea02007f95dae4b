//! Registry of currently running scrape runs.
//!
//! Injected shared state with a register/deregister lifecycle tied to run
//! start and terminal-status observation. Owned by whoever wires the
//! pipeline (the server holds one per process) and shared into the run
//! controller, so introspection and abort-all work the same in
//! multi-instance deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A run currently tracked as in-flight.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRun {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub source_urls: Vec<String>,
}

/// Shared registry of in-flight runs.
#[derive(Default)]
pub struct RunRegistry {
    runs: RwLock<HashMap<String, ActiveRun>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a run from the moment it starts.
    pub fn register(&self, run_id: impl Into<String>, source_urls: Vec<String>) {
        let run_id = run_id.into();
        self.runs.write().unwrap().insert(
            run_id.clone(),
            ActiveRun {
                run_id,
                started_at: Utc::now(),
                source_urls,
            },
        );
    }

    /// Stop tracking a run once a terminal status is observed (or an abort
    /// was issued for it). Unknown ids are a no-op.
    pub fn deregister(&self, run_id: &str) {
        self.runs.write().unwrap().remove(run_id);
    }

    /// Snapshot of currently tracked runs.
    pub fn active(&self) -> Vec<ActiveRun> {
        self.runs.read().unwrap().values().cloned().collect()
    }

    /// Remove and return all tracked run ids, for abort-all.
    pub fn drain(&self) -> Vec<String> {
        self.runs.write().unwrap().drain().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.runs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_drain() {
        let registry = RunRegistry::new();
        registry.register("run-1", vec!["https://a".into()]);
        registry.register("run-2", vec![]);
        assert_eq!(registry.len(), 2);

        registry.deregister("run-1");
        assert_eq!(registry.active().len(), 1);

        let drained = registry.drain();
        assert_eq!(drained, vec!["run-2".to_string()]);
        assert!(registry.is_empty());
    }
}

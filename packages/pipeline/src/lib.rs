//! Scrape-Run Orchestration and Job Digest Pipeline
//!
//! Manages the lifecycle of an asynchronous remote scraping job, collects
//! and partitions its results, persists raw items idempotently, structures
//! them through an external AI service with a deterministic local fallback,
//! and distributes dedup-aware digests to subscribers.
//!
//! # Design
//!
//! - Bounded waiting: the run controller never outlives its watchdog cap,
//!   no matter what the remote run does
//! - Idempotence by identity: every persisted record is keyed by one stable
//!   identity, so repeated runs and concurrent writers converge
//! - Partial success as the normal case: callers get structured counts,
//!   not a pass/fail flag
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pipeline::{Coordinator, MemoryStore, RunRegistry, ScrapeJobConfig};
//! use pipeline::testing::{MockEngine, MockStructurer};
//!
//! let store = Arc::new(MemoryStore::new());
//! let coordinator = Coordinator::new(
//!     Arc::new(MockEngine::new()),
//!     Arc::new(RunRegistry::new()),
//!     Arc::new(MockStructurer::new()),
//!     store.clone(),
//!     store.clone(),
//! );
//! let summary = coordinator
//!     .orchestrate(&ScrapeJobConfig::new(["https://example.com/groups/1"]))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (engine, structurer, stores, mailer)
//! - [`types`] - Domain data types
//! - [`coordinator`] - End-to-end run orchestration
//! - [`controller`] - Remote run state machine with watchdog
//! - [`collector`] - Result fetch and per-source partitioning
//! - [`identity`] - Stable identity resolution
//! - [`fallback`] - Heuristic local extractor
//! - [`ai`] - External structuring service glue
//! - [`digest`] - Subscriber digest engine
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod collector;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod digest;
pub mod engines;
pub mod error;
pub mod fallback;
pub mod identity;
pub mod mailers;
pub mod registry;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    EngineError, IdentityError, MailError, PipelineError, StoreError, StructuringError,
};
pub use traits::{
    engine::ScrapeEngine,
    mailer::DigestMailer,
    store::{JobStore, RawPostStore, SubscriberStore, UpsertOutcome},
    structurer::{JobStructurer, StructuringResponse},
};
pub use types::{
    job::{JobDraft, StructuredJob, FALLBACK_TITLE, NOT_SPECIFIED},
    post::{Attachment, Engagement, RawPost},
    run::{RunStatus, ScrapeRun},
    subscriber::Subscriber,
    summary::{DigestReport, JobExtraction, ProcessingMethod, ScrapeSummary, SourceBreakdown},
};

// Re-export pipeline components
pub use ai::{parse_structured_jobs, HttpStructurer};
pub use collector::{collect, partition_by_source, SourceBucket};
pub use config::{CoordinatorPolicy, ScrapeJobConfig, WatchdogConfig};
pub use controller::{RunController, RunOutcome};
pub use coordinator::Coordinator;
pub use digest::DigestEngine;
pub use fallback::FallbackExtractor;
pub use identity::{IdentityFields, IdentityPolicy, GENERATED_PREFIX};
pub use mailers::HttpMailer;
pub use registry::{ActiveRun, RunRegistry};
pub use stores::MemoryStore;

#[cfg(feature = "apify")]
pub use engines::ApifyEngine;

//! Core trait abstractions at the collaborator seams.

pub mod engine;
pub mod mailer;
pub mod store;
pub mod structurer;

pub use engine::ScrapeEngine;
pub use mailer::DigestMailer;
pub use store::{JobStore, RawPostStore, SubscriberStore, UpsertOutcome};
pub use structurer::{JobStructurer, StructuringResponse};

//! Typed errors for the pipeline library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Each collaborator seam has
//! its own error enum; `PipelineError` covers only the two conditions that
//! abort an invocation.

use thiserror::Error;

/// Invocation-fatal pipeline errors.
///
/// Everything else in the pipeline is recovered locally: abort failures are
/// logged, structuring failures fall back to the local extractor,
/// unresolvable identities drop single records, duplicate-key races skip
/// single records, and mail failures isolate single subscribers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote run could not be started at all.
    #[error("failed to start scrape run after {elapsed_ms}ms: {source}")]
    RunStart {
        #[source]
        source: EngineError,
        elapsed_ms: u64,
    },

    /// The document store could not be reached.
    #[error("document store unavailable after {elapsed_ms}ms: {source}")]
    Store {
        #[source]
        source: StoreError,
        elapsed_ms: u64,
    },
}

/// Errors from the remote scrape engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport failure (connection, timeout, TLS).
    #[error("engine transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The engine returned a non-success response.
    #[error("engine API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The engine returned a payload the client could not decode.
    #[error("engine response decode error: {0}")]
    Decode(String),
}

/// Errors from the external structuring service.
#[derive(Debug, Error)]
pub enum StructuringError {
    /// Transport failure reaching the service.
    #[error("structuring transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service returned a non-success response.
    #[error("structuring API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-key conflict raised by the store during upsert. Skippable.
    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    /// The store itself cannot be reached. Fatal to the invocation.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from the mail collaborator.
#[derive(Debug, Error)]
pub enum MailError {
    /// Transport failure reaching the mail API.
    #[error("mail transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The mail API rejected the send.
    #[error("mail API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Identity resolution failure for a single record.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No natural identity and generation disallowed on this path.
    #[error("no resolvable identity (content sample: {sample:?})")]
    Unresolvable { sample: String },
}

/// Result type alias for invocation-level pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

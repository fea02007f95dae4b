//! Mail sender trait.

use async_trait::async_trait;

use crate::error::MailError;
use crate::types::job::StructuredJob;

/// The mail collaborator used by the digest engine.
///
/// Errors on transport failure; the digest engine treats any error as
/// "not sent" and leaves subscriber state untouched.
#[async_trait]
pub trait DigestMailer: Send + Sync {
    async fn send_digest(&self, email: &str, jobs: &[StructuredJob]) -> Result<(), MailError>;
}

//! External AI structuring service trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StructuringError;

/// Wire-shaped response from the structuring service.
///
/// `success: true` with empty `data` is a valid outcome (the service saw no
/// jobs in the text) and is distinct from failure; only `success: false` or
/// a transport error triggers the local fallback extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuringResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StructuringResponse {
    /// A successful response carrying a payload.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failure response with a service-reported reason.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// The structuring service collaborator.
///
/// Takes the rendered text of a post batch and returns job candidates in
/// the service's loosely-typed envelope. Transport errors are the caller's
/// signal to fall back, same as `success: false`.
#[async_trait]
pub trait JobStructurer: Send + Sync {
    async fn filter_and_structure(&self, text: &str) -> Result<StructuringResponse, StructuringError>;
}

//! HTTP client for the external structuring service.

use async_trait::async_trait;
use serde_json::json;

use crate::error::StructuringError;
use crate::traits::structurer::{JobStructurer, StructuringResponse};

/// Calls the remote `filterAndStructure` endpoint.
pub struct HttpStructurer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpStructurer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl JobStructurer for HttpStructurer {
    async fn filter_and_structure(&self, text: &str) -> Result<StructuringResponse, StructuringError> {
        let mut req = self.client.post(&self.endpoint).json(&json!({ "text": text }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StructuringError::Transport(Box::new(e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StructuringError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        resp.json::<StructuringResponse>()
            .await
            .map_err(|e| StructuringError::Transport(Box::new(e)))
    }
}

//! Text completion port trait

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ExternalServiceError;

/// One prompt, answered `n` times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub n: u32,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns one string per choice the API produced, in order
    async fn complete(&self, request: &CompletionRequest)
        -> Result<Vec<String>, ExternalServiceError>;
}

//! Provider abstraction for the generative-text backend
//!
//! The relay talks to its backend only through this trait, which keeps the
//! request handler testable with a stub in place of the network client.

use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Failures below the level of the API's own error payload
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Trait for generative-text providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a single `generateContent` request
    ///
    /// Errors reported in-band by the API are returned inside the response,
    /// not as `ProviderError`.
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

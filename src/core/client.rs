//! Gemini HTTP client
//!
//! Sends one `generateContent` call per relayed question. The API key travels
//! as the `key` query parameter and is never written to logs.

use crate::core::constants::gemini;
use crate::core::provider::{Provider, ProviderError};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Gemini client for the Generative Language API
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `model` - Model name placed in the request path
    /// * `timeout` - Optional request timeout in seconds
    pub fn new(base_url: String, model: String, timeout: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Get the endpoint URL for the configured model, without the API key
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url,
            self.model,
            gemini::GENERATE_CONTENT
        )
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.endpoint_url();
        debug!("Sending generateContent request to {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[(gemini::API_KEY_PARAM, api_key)])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            // without_url keeps the key out of the error text
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        debug!("Gemini responded with status {}", status);

        // Errors are reported in the JSON body, so the status is not checked here
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            ProviderError::Decode(format!("status {}: {}", status.as_u16(), e))
        })
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

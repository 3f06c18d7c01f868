//! Core Gemini client
//!
//! Owns the HTTP client, endpoint construction, and authentication.

use anyhow::Result;
use reqwest::Client;
use tracing::error;

use crate::config::GeminiConfig;
use crate::constants;
use crate::error::GenerationError;

/// Gemini API client
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    fn create_http_client(config: &GeminiConfig) -> Client {
        Client::builder()
            .user_agent("Atelier/1.0")
            .connect_timeout(constants::http::CONNECT_TIMEOUT)
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build HTTP client: {}. Using default client.", e);
                Client::new()
            })
    }

    /// Create a client from configuration
    ///
    /// Fails with [`GenerationError::MissingApiKey`] when no key is set.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key()
            .ok_or(GenerationError::MissingApiKey)?
            .to_string();
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: GeminiConfig, api_key: String) -> Self {
        Self {
            http: Self::create_http_client(&config),
            config,
            api_key,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// `generateContent` URL for `model`
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// POST request with authentication headers
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
    }

    /// Turn a non-success response into an error carrying the body text
    pub(crate) async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        error!("Gemini error response: {} - {}", status, error_text);
        Err(anyhow::anyhow!("Gemini error: {} - {}", status, error_text))
    }
}

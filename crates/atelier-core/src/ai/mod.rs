//! Generative AI features
//!
//! - [`client::GeminiClient`]: REST client for text and image generation
//! - [`visualizer`]: three-angle room renders from a prompt and optional photo
//! - [`ideas`]: short design prompts with a static fallback
//!
//! Features depend on the [`ImageBackend`] and [`TextBackend`] ports rather
//! than the client directly, so they can be exercised without network access.

pub mod client;
pub mod ideas;
pub mod visualizer;

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;

use crate::constants;
use crate::error::GenerationError;

pub use client::GeminiClient;
pub use ideas::{suggest_ideas, IdeaSource, Ideas, FALLBACK_IDEAS};
pub use visualizer::{visualize, RoomRequest, ANGLE_MODIFIERS};

/// Produces one image per call
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn render(
        &self,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<GeneratedImage>;
}

/// Produces free text for a prompt
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// A user-supplied photo the renders should be based on
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    /// Base64 payload without any `data:` prefix
    pub data: String,
    pub mime_type: String,
}

impl ReferenceImage {
    /// Validate a base64 payload
    ///
    /// A full data URL is accepted too; everything up to the first comma is
    /// dropped.
    pub fn new(data: &str, mime_type: &str) -> Result<Self, GenerationError> {
        let payload = match data.strip_prefix("data:") {
            Some(rest) => rest.split_once(',').map(|(_, b)| b).unwrap_or(rest),
            None => data,
        }
        .trim();

        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| GenerationError::InvalidReference(e.to_string()))?;

        Ok(Self {
            data: payload.to_string(),
            mime_type: mime_type.to_string(),
        })
    }
}

/// One rendered image as returned upstream
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

impl GeneratedImage {
    pub fn new(mime_type: Option<&str>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or(constants::ai::DEFAULT_IMAGE_MIME)
                .to_string(),
            data: data.into(),
        }
    }

    /// `data:<mime>;base64,<payload>`, displayable directly by a browser
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

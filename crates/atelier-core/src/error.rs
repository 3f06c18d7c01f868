//! Domain error types surfaced to HTTP callers

use thiserror::Error;

/// Room-visualization failures
///
/// Display strings are the messages returned to the site.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured
    #[error("Gemini API key not configured.")]
    MissingApiKey,

    /// The request carried no prompt text
    #[error("A prompt is required.")]
    EmptyPrompt,

    /// The reference image payload is not valid base64
    #[error("Reference image is not valid base64: {0}")]
    InvalidReference(String),

    /// Every variant failed upstream
    #[error("Failed to generate any images.")]
    NoImages { attempted: usize },
}

impl GenerationError {
    /// Whether the caller sent a bad request (as opposed to a server-side failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GenerationError::EmptyPrompt | GenerationError::InvalidReference(_)
        )
    }
}

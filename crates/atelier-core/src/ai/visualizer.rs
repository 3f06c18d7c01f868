//! Three-angle room visualization
//!
//! One request fans out into three renders of the same room, each with a
//! different camera modifier appended to the prompt. Individual failures are
//! tolerated; the call fails only when every render fails.

use futures::future::join_all;
use tracing::{info, warn};

use super::{GeneratedImage, ImageBackend, ReferenceImage};
use crate::error::GenerationError;

/// Camera modifiers, one per render, in output order
pub const ANGLE_MODIFIERS: [&str; 3] = [
    "Cinematic front view, wide angle, photorealistic, detailed interior design",
    "Isometric or 45-degree corner view, showcasing depth and layout, photorealistic",
    "Detailed close-up perspective or alternative angle focusing on textures and furniture",
];

/// A validated visualization request
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRequest {
    pub prompt: String,
    pub reference: Option<ReferenceImage>,
}

impl RoomRequest {
    /// Build from the raw fields a client sends
    ///
    /// The reference photo is used only when both payload and MIME type are
    /// present.
    pub fn from_parts(
        prompt: Option<&str>,
        image: Option<&str>,
        mime_type: Option<&str>,
    ) -> Result<Self, GenerationError> {
        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(GenerationError::EmptyPrompt)?;

        let reference = match (image, mime_type) {
            (Some(data), Some(mime)) if !data.is_empty() && !mime.is_empty() => {
                Some(ReferenceImage::new(data, mime)?)
            }
            _ => None,
        };

        Ok(Self {
            prompt: prompt.to_string(),
            reference,
        })
    }

    /// The full prompt for each render
    pub fn variant_prompts(&self) -> Vec<String> {
        ANGLE_MODIFIERS
            .iter()
            .map(|modifier| format!("{}. {}", self.prompt, modifier))
            .collect()
    }
}

/// Render every angle concurrently and keep the successes in angle order
pub async fn visualize(
    backend: &dyn ImageBackend,
    request: &RoomRequest,
) -> Result<Vec<GeneratedImage>, GenerationError> {
    let prompts = request.variant_prompts();
    info!(
        "Rendering {} variants (reference image: {})",
        prompts.len(),
        request.reference.is_some()
    );

    let renders = prompts
        .iter()
        .map(|prompt| backend.render(prompt, request.reference.as_ref()));
    let results = join_all(renders).await;

    let mut images = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(image) => images.push(image),
            Err(e) => warn!("Variant {} failed: {}", index + 1, e),
        }
    }

    if images.is_empty() {
        return Err(GenerationError::NoImages {
            attempted: prompts.len(),
        });
    }

    info!("Rendered {} of {} variants", images.len(), prompts.len());
    Ok(images)
}

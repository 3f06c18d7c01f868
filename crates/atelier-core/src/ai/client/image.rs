//! Single-image generation

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::core::GeminiClient;
use crate::ai::{GeneratedImage, ImageBackend, ReferenceImage};
use crate::constants;

impl GeminiClient {
    /// Render one image for `prompt`, optionally conditioned on a photo
    pub async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<GeneratedImage> {
        let body = image_request_body(prompt, reference);

        let request = self.build_request(&self.endpoint(model));
        let response = request.json(&body).send().await?;
        let response = self.handle_error_response(response).await?;

        let json: Value = response.json().await?;
        let image = extract_image(&json).ok_or_else(|| anyhow!("response contained no image"))?;
        debug!("Image response: {} ({} bytes base64)", image.mime_type, image.data.len());
        Ok(image)
    }
}

#[async_trait]
impl ImageBackend for GeminiClient {
    async fn render(
        &self,
        prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<GeneratedImage> {
        let model = self.config().image_model.clone();
        self.generate_image(&model, prompt, reference).await
    }
}

/// Request body; the reference photo, when present, precedes the text part
pub(crate) fn image_request_body(prompt: &str, reference: Option<&ReferenceImage>) -> Value {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = reference {
        parts.push(serde_json::json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.data
            }
        }));
    }
    parts.push(serde_json::json!({"text": prompt}));

    serde_json::json!({
        "contents": [{"role": "user", "parts": parts}],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": {"aspectRatio": constants::ai::IMAGE_ASPECT_RATIO}
        }
    })
}

/// First inline image of the first candidate
///
/// Both camelCase and snake_case field names are accepted.
pub(crate) fn extract_image(json: &Value) -> Option<GeneratedImage> {
    json.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("inlineData").or_else(|| part.get("inline_data")))
        .find_map(|inline| {
            let data = inline.get("data")?.as_str()?;
            let mime = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(|m| m.as_str());
            Some(GeneratedImage::new(mime, data))
        })
}

//! Simple text generation

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::core::GeminiClient;
use crate::ai::TextBackend;

impl GeminiClient {
    /// Single-turn text call; returns the concatenated text parts, trimmed
    pub async fn call_simple(&self, model: &str, user_message: &str) -> Result<String> {
        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": user_message}]
            }]
        });

        let request = self.build_request(&self.endpoint(model));
        let response = request.json(&body).send().await?;
        let response = self.handle_error_response(response).await?;

        let json: Value = response.json().await?;
        let text = extract_text(&json);
        debug!("Text response: {} chars", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextBackend for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let model = self.config().text_model.clone();
        self.call_simple(&model, prompt).await
    }
}

/// Text of the first candidate, all parts joined
pub(crate) fn extract_text(json: &Value) -> String {
    json.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

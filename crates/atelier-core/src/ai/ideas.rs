//! Design-prompt suggestions
//!
//! Asks the text model for a handful of short prompts. Any failure (no key,
//! upstream error, unparseable reply) yields a fixed list instead, so callers
//! always get ideas.

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{debug, warn};

use super::TextBackend;

/// Returned whenever live suggestions are unavailable
pub const FALLBACK_IDEAS: [&str; 5] = [
    "Minimalist Scandinavian living room with natural light",
    "Industrial chic loft with exposed brick walls",
    "Cozy bohemian bedroom with hanging plants",
    "Modern luxury kitchen with marble island",
    "Zen japanese garden inspired bathroom",
];

const IDEAS_PROMPT: &str = "\
Generate 5 creative, short interior design prompts (under 15 words each).
Mix styles such as Modern, Bohemian, Industrial, Minimalist and Luxury.
Return ONLY a raw JSON array of strings, with no markdown formatting.";

/// Where a set of ideas came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaSource {
    Live,
    Fallback,
}

/// A set of prompt suggestions
#[derive(Debug, Clone, PartialEq)]
pub struct Ideas {
    pub ideas: Vec<String>,
    pub source: IdeaSource,
}

impl Ideas {
    pub fn fallback() -> Self {
        Self {
            ideas: FALLBACK_IDEAS.iter().map(|s| s.to_string()).collect(),
            source: IdeaSource::Fallback,
        }
    }
}

/// Fetch suggestions; `None` means no backend is configured
pub async fn suggest_ideas(backend: Option<&dyn TextBackend>) -> Ideas {
    let Some(backend) = backend else {
        debug!("No text backend configured, using fallback ideas");
        return Ideas::fallback();
    };

    match backend.complete(IDEAS_PROMPT).await {
        Ok(text) => match parse_ideas(&text) {
            Ok(ideas) => Ideas {
                ideas,
                source: IdeaSource::Live,
            },
            Err(e) => {
                warn!("Unusable ideas reply: {}, using fallback", e);
                Ideas::fallback()
            }
        },
        Err(e) => {
            warn!("Idea generation failed: {}, using fallback", e);
            Ideas::fallback()
        }
    }
}

/// Parse a model reply into a list of prompts
///
/// Markdown code fences are stripped first. Blank entries are dropped and an
/// empty list is an error.
pub fn parse_ideas(text: &str) -> Result<Vec<String>> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let parsed: Vec<String> = serde_json::from_str(cleaned.trim())?;

    let ideas: Vec<String> = parsed
        .into_iter()
        .map(|idea| idea.trim().to_string())
        .filter(|idea| !idea.is_empty())
        .collect();

    if ideas.is_empty() {
        bail!("reply contained no ideas");
    }
    Ok(ideas)
}

//! Atelier Core - Shared library for the studio site backend
//!
//! This crate provides:
//! - Horizontal-scroll choreography (snap points, progress mapping, pins)
//! - Gemini-backed room visualization and prompt ideas
//! - Lead capture storage
//! - Configuration and filesystem layout

pub mod ai;
pub mod choreo;
pub mod config;
pub mod constants;
pub mod error;
pub mod paths;
pub mod storage;

// Re-exports for convenience
pub use ai::{GeminiClient, ImageBackend, TextBackend};
pub use choreo::{Choreographer, ScrollHost, TrackConfig, TrackGeometry};
pub use config::AtelierConfig;
pub use error::GenerationError;
pub use storage::{Database, LeadStore};

//! Gemini REST client
//!
//! Non-streaming `generateContent` calls only:
//! - [`GeminiClient::call_simple`] for text
//! - [`GeminiClient::generate_image`] for single renders

pub mod core;
pub mod image;
pub mod simple;

pub use core::GeminiClient;

//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// HTTP client configuration
pub mod http {
    use super::*;

    /// Connection timeout for upstream requests
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Whole-request timeout; image generation routinely takes tens of seconds
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
}

/// Generative API configuration
pub mod ai {
    /// Default Gemini REST endpoint
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Model used for room renders
    pub const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

    /// Fast text model used for prompt ideas
    pub const TEXT_MODEL: &str = "gemini-2.0-flash";

    /// Aspect ratio requested for every render
    pub const IMAGE_ASPECT_RATIO: &str = "4:3";

    /// MIME type assumed when the upstream omits one
    pub const DEFAULT_IMAGE_MIME: &str = "image/png";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
}

/// HTTP server configuration
pub mod server {
    /// Default listen address
    pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

    /// Largest request body read from a client (reference images are base64)
    pub const MAX_BODY_BYTES: u64 = 25 * 1024 * 1024;
}

/// Filesystem layout
pub mod fs {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".atelier";

    /// Config file inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// SQLite database file name
    pub const DATABASE_FILE_NAME: &str = "atelier.db";

    /// Logs subdirectory name
    pub const LOGS_DIR_NAME: &str = "logs";
}

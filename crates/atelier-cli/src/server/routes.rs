//! Request routing
//!
//! The router works on plain method/path/body triples so every route can be
//! exercised without opening a socket.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tiny_http::Method;
use tracing::{error, info, warn};

use atelier_core::ai::{self, ImageBackend, RoomRequest, TextBackend};
use atelier_core::error::GenerationError;
use atelier_core::storage::LeadStore;

/// Status code and JSON body of a handled request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, json!({ "error": message.into() }))
    }

    fn not_found() -> Self {
        Self::error(404, "Not found")
    }

    fn method_not_allowed() -> Self {
        Self::error(405, "Method not allowed")
    }
}

/// Dependencies shared by all routes
///
/// Backends are absent when no API key is configured.
#[derive(Clone)]
pub struct AppState {
    pub images: Option<Arc<dyn ImageBackend>>,
    pub text: Option<Arc<dyn TextBackend>>,
    pub leads: LeadStore,
}

/// `POST /api/generate-image` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageBody {
    prompt: Option<String>,
    image: Option<String>,
    mime_type: Option<String>,
}

pub struct Router {
    state: AppState,
}

impl Router {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Dispatch one request
    pub async fn handle(&self, method: &Method, url: &str, body: &[u8]) -> ApiResponse {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match (path, method) {
            ("/api/generate-image", Method::Post) => self.generate_image(body).await,
            ("/api/generate-ideas", Method::Get) => self.generate_ideas().await,
            ("/api/leads", Method::Post) => self.create_lead(body),
            ("/api/leads", Method::Get) => self.list_leads(),
            ("/api/generate-image" | "/api/generate-ideas" | "/api/leads", _) => {
                ApiResponse::method_not_allowed()
            }
            _ => ApiResponse::not_found(),
        }
    }

    async fn generate_image(&self, body: &[u8]) -> ApiResponse {
        let Some(backend) = self.state.images.as_deref() else {
            error!("Image generation requested without an API key");
            return ApiResponse::error(500, GenerationError::MissingApiKey.to_string());
        };

        let parsed: GenerateImageBody = match serde_json::from_slice(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Malformed generate-image body: {}", e);
                return ApiResponse::error(400, "Invalid request body");
            }
        };

        let request = match RoomRequest::from_parts(
            parsed.prompt.as_deref(),
            parsed.image.as_deref(),
            parsed.mime_type.as_deref(),
        ) {
            Ok(request) => request,
            Err(e) => return generation_failure(e),
        };

        match ai::visualize(backend, &request).await {
            Ok(images) => {
                let results: Vec<String> = images.iter().map(|image| image.data_url()).collect();
                ApiResponse::new(200, json!({ "results": results }))
            }
            Err(e) => generation_failure(e),
        }
    }

    async fn generate_ideas(&self) -> ApiResponse {
        let ideas = ai::suggest_ideas(self.state.text.as_deref()).await;
        info!("Serving {} ideas ({:?})", ideas.ideas.len(), ideas.source);
        ApiResponse::new(200, json!({ "ideas": ideas.ideas }))
    }

    fn create_lead(&self, body: &[u8]) -> ApiResponse {
        let submission: Value = match serde_json::from_slice(body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) | Err(_) => {
                warn!("Rejected lead body that is not a JSON object");
                return ApiResponse::new(
                    400,
                    json!({ "success": false, "error": "Lead must be a JSON object" }),
                );
            }
        };

        match self.state.leads.create(submission) {
            Ok(_) => ApiResponse::new(
                201,
                json!({ "success": true, "message": "Lead saved successfully" }),
            ),
            Err(e) => {
                error!("Failed to save lead: {:#}", e);
                ApiResponse::new(500, json!({ "success": false, "error": "Failed to save lead" }))
            }
        }
    }

    fn list_leads(&self) -> ApiResponse {
        match self.state.leads.list() {
            Ok(leads) => ApiResponse::new(200, json!({ "success": true, "leads": leads })),
            Err(e) => {
                error!("Failed to fetch leads: {:#}", e);
                ApiResponse::new(
                    500,
                    json!({ "success": false, "error": "Failed to fetch leads" }),
                )
            }
        }
    }
}

fn generation_failure(e: GenerationError) -> ApiResponse {
    if e.is_client_error() {
        ApiResponse::error(400, e.to_string())
    } else {
        error!("Image generation failed: {}", e);
        ApiResponse::error(500, e.to_string())
    }
}

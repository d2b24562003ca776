//! Wire models for the Comic Factory HTTP API.
//!
//! Both generation endpoints answer with the same envelope
//! ([`ComicResponse`]); which optional fields are populated depends on the
//! endpoint. Remote failures arrive as a non-2xx status whose JSON body
//! carries a FastAPI-style `detail` field.

use serde::{Deserialize, Serialize};

/// One comic panel: an illustration prompt plus its dialogue line.
///
/// Produced only by the remote service; immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPrompt {
    /// Scene description driving downstream image generation.
    pub description: String,
    /// Dialogue line rendered onto the panel.
    pub dialogue: String,
}

/// Envelope returned by `/generate-prompts` and `/generate-comic`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicResponse {
    pub success: bool,
    pub message: String,
    /// Server-relative path of the rendered ZIP bundle.
    pub zip_url: Option<String>,
    /// Server-relative path of the rendered PDF.
    pub pdf_url: Option<String>,
    /// Body-level failure description when `success` is false.
    pub error: Option<String>,
    /// Generated panel prompts, in panel order.
    pub prompts: Option<Vec<PanelPrompt>>,
}

/// Request body for `/generate-comic`: the full prompt sequence.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateComicRequest {
    pub prompts: Vec<PanelPrompt>,
}

/// FastAPI-style error envelope on non-2xx response bodies.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

/// Extract the `detail` message from a non-2xx response body.
///
/// Returns `None` for non-JSON bodies and for bodies whose `detail` is
/// absent or not a string; callers fall back to a generic message.
pub fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok()?.detail
}

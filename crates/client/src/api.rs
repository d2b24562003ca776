//! REST client for the Comic Factory HTTP endpoints.
//!
//! Wraps the generation API (prompt generation, comic rendering, artifact
//! download, liveness probe) using [`reqwest`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use comicfactory_core::download::join_url;
use comicfactory_core::error::CoreError;
use comicfactory_core::request::ComicRequest;
use comicfactory_core::response::{ComicResponse, GenerateComicRequest, PanelPrompt};

/// Default Comic Factory API base URL (the backend's local bind address).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Per-request timeout for `/generate-comic` in seconds. Rendering every
/// panel server-side routinely takes minutes.
pub const COMIC_TIMEOUT_SECS: u64 = 600;

/// HTTP client for a single Comic Factory API server.
#[derive(Clone)]
pub struct ComicFactoryApi {
    client: reqwest::Client,
    base_url: String,
}

/// Response returned by the liveness probe at `GET /`.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    /// Human-readable server greeting.
    pub message: String,
}

/// Errors from the Comic Factory REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Comic Factory API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body. Non-2xx bodies usually carry a JSON `detail`.
        body: String,
    },

    /// A resource path failed local validation; no request was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Writing a downloaded artifact to disk failed.
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl ComicFactoryApi {
    /// Create an API client with the default request timeout.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create an API client with a custom default timeout.
    ///
    /// The timeout applies to every call except `/generate-comic`, which
    /// always uses [`COMIC_TIMEOUT_SECS`].
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request illustration prompts for a comic.
    ///
    /// Sends a `POST /generate-prompts` request with the full request as
    /// its JSON body. The returned envelope carries `prompts` on success.
    pub async fn generate_prompts(
        &self,
        request: &ComicRequest,
    ) -> Result<ComicResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/generate-prompts", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Request comic rendering from a prompt sequence.
    ///
    /// Sends a `POST /generate-comic` request wrapping the prompts, with
    /// the extended [`COMIC_TIMEOUT_SECS`] timeout. The returned envelope
    /// carries `zip_url` / `pdf_url` on success.
    pub async fn generate_comic(
        &self,
        prompts: &[PanelPrompt],
    ) -> Result<ComicResponse, ApiError> {
        let body = GenerateComicRequest {
            prompts: prompts.to_vec(),
        };

        let response = self
            .client
            .post(format!("{}/generate-comic", self.base_url))
            .json(&body)
            .timeout(Duration::from_secs(COMIC_TIMEOUT_SECS))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch an artifact and write it to `{output_dir}/{filename}`.
    ///
    /// `resource_path` is the server-relative path from a [`ComicResponse`]
    /// (absolute URLs pass through untouched). Returns the written path.
    pub async fn download(
        &self,
        resource_path: &str,
        filename: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let url = join_url(&self.base_url, resource_path)?;

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(output_dir).await?;
        let dest = output_dir.join(filename);
        tokio::fs::write(&dest, &bytes).await?;

        Ok(dest)
    }

    /// Probe the server liveness endpoint at `GET /`.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ApiError::Api`] containing the status
    /// and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

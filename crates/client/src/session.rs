//! Studio session: the stateful front end of the generation flow.
//!
//! One [`StudioSession`] owns the editable request, the received prompt
//! list, the last response envelope, and the single error banner. Every
//! operation takes `&mut self`, so a session never has two calls in
//! flight. A failed call replaces only the banner; prompts and results
//! survive until a later call succeeds.

use std::path::PathBuf;

use comicfactory_core::error::CoreError;
use comicfactory_core::request::ComicRequest;
use comicfactory_core::response::{extract_detail, ComicResponse, PanelPrompt};

use crate::api::{ApiError, ComicFactoryApi};

// ---------------------------------------------------------------------------
// Banner messages
// ---------------------------------------------------------------------------

/// Banner for invoking comic generation before any prompts exist.
pub const MSG_GENERATE_PROMPTS_FIRST: &str = "Please generate prompts first";
/// Generic banner for a failed prompt generation call.
pub const MSG_PROMPTS_FAILED: &str = "Failed to generate prompts";
/// Generic banner for a failed comic generation call.
pub const MSG_COMIC_FAILED: &str = "Failed to generate comic";
/// Generic banner for a failed artifact download.
pub const MSG_DOWNLOAD_FAILED: &str = "Failed to download file";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by session operations.
///
/// Each variant displays as exactly the banner string recorded on the
/// session; the variant says which class of action failed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Local pre-flight validation failed; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The remote call failed, or the server reported a failure.
    #[error("{0}")]
    Remote(String),

    /// Fetching or writing an artifact failed.
    #[error("{0}")]
    Download(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns the full client-side state of one comic generation flow.
pub struct StudioSession {
    api: ComicFactoryApi,
    output_dir: PathBuf,
    request: ComicRequest,
    prompts: Vec<PanelPrompt>,
    last_response: Option<ComicResponse>,
    error: Option<String>,
}

impl StudioSession {
    /// Create a session talking to the given API, saving downloads under
    /// `output_dir`.
    pub fn new(api: ComicFactoryApi, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            output_dir: output_dir.into(),
            request: ComicRequest::default(),
            prompts: Vec::new(),
            last_response: None,
            error: None,
        }
    }

    // ---- state accessors ----

    /// The editable comic request.
    pub fn request(&self) -> &ComicRequest {
        &self.request
    }

    /// Mutable access to the request for field edits.
    pub fn request_mut(&mut self) -> &mut ComicRequest {
        &mut self.request
    }

    /// Prompts from the last successful generation, in server order.
    pub fn prompts(&self) -> &[PanelPrompt] {
        &self.prompts
    }

    /// Replace the prompt list, e.g. with prompts loaded from a saved file.
    pub fn set_prompts(&mut self, prompts: Vec<PanelPrompt>) {
        self.prompts = prompts;
    }

    /// The last successful response envelope, if any.
    pub fn last_response(&self) -> Option<&ComicResponse> {
        self.last_response.as_ref()
    }

    /// The current error banner, if any.
    pub fn error_banner(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ---- operations ----

    /// Run the prompt generation step.
    ///
    /// Validates the request locally first; a validation failure sets the
    /// banner and issues no network call. On success both the prompt list
    /// and the last response are replaced. On any failure they are left
    /// untouched and only the banner changes.
    pub async fn generate_prompts(&mut self) -> Result<(), SessionError> {
        if let Err(CoreError::Validation(msg)) = self.request.validate_for_submission() {
            return self.fail(SessionError::Validation(msg));
        }
        self.error = None;

        tracing::info!(genre = %self.request.genre, "Requesting illustration prompts");
        match self.api.generate_prompts(&self.request).await {
            Ok(response) => {
                let received = if response.success {
                    response.prompts.clone()
                } else {
                    None
                };
                match received {
                    Some(prompts) => {
                        tracing::info!(count = prompts.len(), "Prompts received");
                        self.prompts = prompts;
                        self.last_response = Some(response);
                        Ok(())
                    }
                    None => {
                        let banner = response
                            .error
                            .clone()
                            .unwrap_or_else(|| MSG_PROMPTS_FAILED.to_string());
                        tracing::warn!(banner = %banner, "Prompt generation reported failure");
                        self.fail(SessionError::Remote(banner))
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Prompt generation request failed");
                self.fail(SessionError::Remote(flatten_api_error(
                    &err,
                    MSG_PROMPTS_FAILED,
                )))
            }
        }
    }

    /// Run the comic rendering step over the received prompts.
    ///
    /// Fails fast when no prompts exist; no network call is made. On
    /// success the last response is replaced (it carries the artifact
    /// URLs) and the prompt list is kept. On failure only the banner
    /// changes.
    pub async fn generate_comic(&mut self) -> Result<(), SessionError> {
        if self.prompts.is_empty() {
            return self.fail(SessionError::Validation(
                MSG_GENERATE_PROMPTS_FIRST.to_string(),
            ));
        }
        self.error = None;

        tracing::info!(panels = self.prompts.len(), "Requesting comic rendering");
        match self.api.generate_comic(&self.prompts).await {
            Ok(response) if response.success => {
                tracing::info!(
                    zip = response.zip_url.is_some(),
                    pdf = response.pdf_url.is_some(),
                    "Comic rendered"
                );
                self.last_response = Some(response);
                Ok(())
            }
            Ok(response) => {
                let banner = response
                    .error
                    .unwrap_or_else(|| MSG_COMIC_FAILED.to_string());
                tracing::warn!(banner = %banner, "Comic generation reported failure");
                self.fail(SessionError::Remote(banner))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Comic generation request failed");
                self.fail(SessionError::Remote(flatten_api_error(
                    &err,
                    MSG_COMIC_FAILED,
                )))
            }
        }
    }

    /// Fetch one artifact and save it under the session's output directory.
    ///
    /// Unlike the requesters this never clears the banner on entry, and a
    /// failure of any kind (network, HTTP, disk) surfaces the one generic
    /// download banner. No other session state is touched.
    pub async fn download(
        &mut self,
        resource_path: &str,
        filename: &str,
    ) -> Result<PathBuf, SessionError> {
        tracing::info!(resource_path, filename, "Downloading artifact");
        match self
            .api
            .download(resource_path, filename, &self.output_dir)
            .await
        {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Artifact saved");
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Artifact download failed");
                self.fail(SessionError::Download(MSG_DOWNLOAD_FAILED.to_string()))
            }
        }
    }

    // ---- private helpers ----

    /// Record the banner for a failure and hand the error to the caller.
    fn fail<T>(&mut self, err: SessionError) -> Result<T, SessionError> {
        self.error = Some(err.to_string());
        Err(err)
    }
}

/// Flatten a REST-layer failure into its banner string: the non-2xx body's
/// `detail` field when present, the generic fallback otherwise.
fn flatten_api_error(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Api { body, .. } => {
            extract_detail(body).unwrap_or_else(|| fallback.to_string())
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_prefers_detail_field() {
        let err = ApiError::Api {
            status: 500,
            body: r#"{"detail": "Failed to generate prompts: llm unavailable"}"#.to_string(),
        };
        assert_eq!(
            flatten_api_error(&err, MSG_PROMPTS_FAILED),
            "Failed to generate prompts: llm unavailable"
        );
    }

    #[test]
    fn flatten_falls_back_without_detail() {
        let err = ApiError::Api {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(flatten_api_error(&err, MSG_COMIC_FAILED), MSG_COMIC_FAILED);
    }

    #[test]
    fn session_error_displays_bare_banner() {
        let err = SessionError::Validation(MSG_GENERATE_PROMPTS_FIRST.to_string());
        assert_eq!(err.to_string(), MSG_GENERATE_PROMPTS_FIRST);
    }
}

//! Download path helpers and fixed artifact filenames.
//!
//! The server hands back server-relative artifact paths (for example
//! `/download/comic_20240101_120000.zip`); these helpers join them onto the
//! configured base URL and pick local filenames.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Artifact filename constants
// ---------------------------------------------------------------------------

/// Local filename for the downloaded ZIP bundle.
pub const ZIP_FILENAME: &str = "comic.zip";
/// Local filename for the downloaded PDF.
pub const PDF_FILENAME: &str = "comic.pdf";
/// Fallback filename when a resource path has no usable segment.
pub const DEFAULT_FILENAME: &str = "download";

// ---------------------------------------------------------------------------
// URL helpers
// ---------------------------------------------------------------------------

/// Join a resource path onto the API base URL.
///
/// Absolute `http(s)` paths are passed through untouched; anything else is
/// treated as server-relative. A blank path is a validation error.
pub fn join_url(base_url: &str, path: &str) -> Result<String, CoreError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(CoreError::Validation(
            "Resource path must not be empty".to_string(),
        ));
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(path.to_string());
    }
    Ok(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Pick a local filename from a resource path: the last path segment with
/// query string and fragment dropped, falling back to [`DEFAULT_FILENAME`].
pub fn filename_from_path(path: &str) -> String {
    let mut clean = path;
    for sep in ['?', '#'] {
        if let Some(i) = clean.find(sep) {
            clean = &clean[..i];
        }
    }

    // For absolute URLs, keep only the part after the host.
    if let Some(rest) = clean
        .strip_prefix("https://")
        .or_else(|| clean.strip_prefix("http://"))
    {
        clean = match rest.find('/') {
            Some(i) => &rest[i..],
            None => "",
        };
    }

    clean
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

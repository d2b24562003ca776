//! Integration tests for the studio session against a stub HTTP server.
//!
//! Each test spins up a private tiny_http server with canned responses and
//! drives a [`StudioSession`] through the generation flow, checking which
//! calls reach the network and which banner each failure surfaces.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use tiny_http::{Response, Server};

use comicfactory_client::api::ComicFactoryApi;
use comicfactory_client::session::{
    SessionError, StudioSession, MSG_COMIC_FAILED, MSG_DOWNLOAD_FAILED,
    MSG_GENERATE_PROMPTS_FIRST, MSG_PROMPTS_FAILED,
};
use comicfactory_core::request::{
    FIELD_CHARACTERS, FIELD_CHARACTER_NAMES, FIELD_GENRE, FIELD_SETTING, MSG_FILL_ALL_FIELDS,
};
use comicfactory_core::response::PanelPrompt;

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

/// Serve canned `(path, status, body)` responses on an ephemeral port.
///
/// Returns the base URL and a counter of every request that reached the
/// server; unknown paths answer 404. The server thread lives for the rest
/// of the test process.
fn spawn_stub(routes: Vec<(String, u16, Vec<u8>)>) -> (String, Arc<AtomicUsize>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let base_url = format!("http://127.0.0.1:{port}");

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_server = Arc::clone(&hits);

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            hits_in_server.fetch_add(1, Ordering::SeqCst);
            let path = request.url().to_string();
            let response = match routes.iter().find(|(p, _, _)| *p == path) {
                Some((_, status, body)) => {
                    Response::from_data(body.clone()).with_status_code(*status)
                }
                None => Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    (base_url, hits)
}

fn json_route(path: &str, status: u16, body: &str) -> (String, u16, Vec<u8>) {
    (path.to_string(), status, body.as_bytes().to_vec())
}

fn session_for(base_url: &str, output_dir: &std::path::Path) -> StudioSession {
    StudioSession::new(ComicFactoryApi::new(base_url), output_dir)
}

fn fill_form(session: &mut StudioSession) {
    let request = session.request_mut();
    request.set_field(FIELD_GENRE, "mystery").unwrap();
    request
        .set_field(FIELD_SETTING, "abandoned lighthouse")
        .unwrap();
    request
        .set_field(FIELD_CHARACTERS, "a keeper and a ghost")
        .unwrap();
    request.set_field(FIELD_CHARACTER_NAMES, "Edda, Moss").unwrap();
}

fn sample_prompt(description: &str) -> PanelPrompt {
    PanelPrompt {
        description: description.to_string(),
        dialogue: String::new(),
    }
}

const PROMPTS_OK: &str = r#"{
    "success": true,
    "message": "Prompts generated successfully",
    "prompts": [
        {"description": "one", "dialogue": "Hello."},
        {"description": "two", "dialogue": ""},
        {"description": "three", "dialogue": "Onward!"}
    ]
}"#;

// ---------------------------------------------------------------------------
// Prompt generation
// ---------------------------------------------------------------------------

/// A blank required field blocks the call before the network: the stub
/// sees zero requests and the session carries the validation banner.
#[tokio::test]
async fn blank_required_field_issues_no_request() {
    let (base_url, hits) = spawn_stub(vec![]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());

    session.request_mut().set_field(FIELD_GENRE, "mystery").unwrap();

    let err = session.generate_prompts().await.unwrap_err();
    assert_matches!(err, SessionError::Validation(_));
    assert_eq!(session.error_banner(), Some(MSG_FILL_ALL_FIELDS));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

/// N prompts in a successful response become exactly N stored prompts in
/// server order, and the response envelope is kept.
#[tokio::test]
async fn successful_prompts_replace_prompt_list_in_order() {
    let (base_url, _) = spawn_stub(vec![json_route("/generate-prompts", 200, PROMPTS_OK)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);

    session.generate_prompts().await.unwrap();

    let prompts = session.prompts();
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[0].description, "one");
    assert_eq!(prompts[1].description, "two");
    assert_eq!(prompts[2].description, "three");
    assert_eq!(prompts[0].dialogue, "Hello.");
    assert!(session.error_banner().is_none());
    assert!(session.last_response().unwrap().success);
}

/// A body-level failure surfaces the body's `error` string and leaves
/// previously received prompts untouched.
#[tokio::test]
async fn prompts_body_failure_surfaces_error_and_keeps_state() {
    let body = r#"{"success": false, "message": "failed", "error": "llm quota exhausted"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-prompts", 200, body)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);
    session.set_prompts(vec![sample_prompt("kept")]);

    let err = session.generate_prompts().await.unwrap_err();
    assert_matches!(err, SessionError::Remote(_));
    assert_eq!(session.error_banner(), Some("llm quota exhausted"));
    assert_eq!(session.prompts().len(), 1);
    assert_eq!(session.prompts()[0].description, "kept");
}

/// `success: true` without a prompt list is still a prompts failure.
#[tokio::test]
async fn prompts_success_without_prompt_list_is_failure() {
    let body = r#"{"success": true, "message": "ok"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-prompts", 200, body)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);

    let err = session.generate_prompts().await.unwrap_err();
    assert_matches!(err, SessionError::Remote(_));
    assert_eq!(session.error_banner(), Some(MSG_PROMPTS_FAILED));
}

/// The `detail` field of a non-2xx body is surfaced verbatim.
#[tokio::test]
async fn http_failure_detail_surfaced_verbatim() {
    let body = r#"{"detail": "Failed to generate prompts: upstream model error"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-prompts", 500, body)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);

    session.generate_prompts().await.unwrap_err();
    assert_eq!(
        session.error_banner(),
        Some("Failed to generate prompts: upstream model error")
    );
}

/// A non-2xx body without `detail` falls back to the generic banner.
#[tokio::test]
async fn http_failure_without_detail_uses_generic_banner() {
    let (base_url, _) = spawn_stub(vec![json_route(
        "/generate-prompts",
        502,
        "<html>bad gateway</html>",
    )]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);

    session.generate_prompts().await.unwrap_err();
    assert_eq!(session.error_banner(), Some(MSG_PROMPTS_FAILED));
}

// ---------------------------------------------------------------------------
// Comic generation
// ---------------------------------------------------------------------------

/// Comic generation with an empty prompt list never reaches the network.
#[tokio::test]
async fn comic_before_prompts_issues_no_request() {
    let (base_url, hits) = spawn_stub(vec![]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());

    let err = session.generate_comic().await.unwrap_err();
    assert_matches!(err, SessionError::Validation(_));
    assert_eq!(session.error_banner(), Some(MSG_GENERATE_PROMPTS_FIRST));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

/// A successful comic response exposes exactly the artifact URLs the
/// server offered, and the prompt list survives.
#[tokio::test]
async fn comic_success_exposes_offered_urls_only() {
    let zip_only = r#"{"success": true, "message": "ok", "zip_url": "/download/c.zip"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-comic", 200, zip_only)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    session.set_prompts(vec![sample_prompt("one"), sample_prompt("two")]);

    session.generate_comic().await.unwrap();

    let response = session.last_response().unwrap();
    assert_eq!(response.zip_url.as_deref(), Some("/download/c.zip"));
    assert!(response.pdf_url.is_none());
    assert_eq!(session.prompts().len(), 2);
}

#[tokio::test]
async fn comic_success_with_pdf_only() {
    let pdf_only = r#"{"success": true, "message": "ok", "pdf_url": "/download/c.pdf"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-comic", 200, pdf_only)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    session.set_prompts(vec![sample_prompt("one")]);

    session.generate_comic().await.unwrap();

    let response = session.last_response().unwrap();
    assert!(response.zip_url.is_none());
    assert_eq!(response.pdf_url.as_deref(), Some("/download/c.pdf"));
}

#[tokio::test]
async fn comic_success_with_both_urls() {
    let both = r#"{
        "success": true,
        "message": "Comic generated successfully",
        "zip_url": "/download/comic_20240101_120000.zip",
        "pdf_url": "/download/comic_20240101_120000.pdf"
    }"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-comic", 200, both)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    session.set_prompts(vec![sample_prompt("one")]);

    session.generate_comic().await.unwrap();

    let response = session.last_response().unwrap();
    assert!(response.zip_url.is_some());
    assert!(response.pdf_url.is_some());
}

/// A failed comic call keeps the previous prompts and result; only the
/// banner changes.
#[tokio::test]
async fn comic_failure_keeps_prompts_and_previous_result() {
    let detail = r#"{"detail": "Failed to generate comic: renderer crashed"}"#;
    let (base_url, _) = spawn_stub(vec![
        json_route("/generate-prompts", 200, PROMPTS_OK),
        json_route("/generate-comic", 500, detail),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    fill_form(&mut session);

    session.generate_prompts().await.unwrap();
    let err = session.generate_comic().await.unwrap_err();

    assert_matches!(err, SessionError::Remote(_));
    assert_eq!(
        session.error_banner(),
        Some("Failed to generate comic: renderer crashed")
    );
    // The prompt list and the prompts-call response both survive.
    assert_eq!(session.prompts().len(), 3);
    assert!(session.last_response().unwrap().prompts.is_some());
}

/// A comic body failure without an `error` field uses the generic banner.
#[tokio::test]
async fn comic_body_failure_uses_generic_banner() {
    let body = r#"{"success": false, "message": "failed"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/generate-comic", 200, body)]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    session.set_prompts(vec![sample_prompt("one")]);

    session.generate_comic().await.unwrap_err();
    assert_eq!(session.error_banner(), Some(MSG_COMIC_FAILED));
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

/// A download writes the exact payload bytes to the requested filename
/// under the session's output directory.
#[tokio::test]
async fn download_writes_payload_to_requested_filename() {
    let payload = b"PK\x03\x04 not a real zip".to_vec();
    let (base_url, _) = spawn_stub(vec![(
        "/download/comic_20240101_120000.zip".to_string(),
        200,
        payload.clone(),
    )]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());

    let path = session
        .download("/download/comic_20240101_120000.zip", "comic.zip")
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("comic.zip"));
    assert_eq!(std::fs::read(&path).unwrap(), payload);
    assert!(session.error_banner().is_none());
}

/// A missing artifact surfaces the download banner and nothing else
/// changes.
#[tokio::test]
async fn download_missing_artifact_sets_banner_only() {
    let (base_url, _) = spawn_stub(vec![]);
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&base_url, dir.path());
    session.set_prompts(vec![sample_prompt("kept")]);

    let err = session.download("/download/gone.zip", "comic.zip").await.unwrap_err();

    assert_matches!(err, SessionError::Download(_));
    assert_eq!(session.error_banner(), Some(MSG_DOWNLOAD_FAILED));
    assert_eq!(session.prompts().len(), 1);
    assert!(!dir.path().join("comic.zip").exists());
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// The liveness probe returns the server's greeting message.
#[tokio::test]
async fn health_probe_returns_server_message() {
    let body = r#"{"message": "AI Comic Factory API is running!"}"#;
    let (base_url, _) = spawn_stub(vec![json_route("/", 200, body)]);

    let api = ComicFactoryApi::new(&base_url);
    let health = api.health().await.unwrap();
    assert_eq!(health.message, "AI Comic Factory API is running!");
}

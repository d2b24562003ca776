//! Subcommand definitions and execution.
//!
//! Each subcommand drives a [`StudioSession`] through the generation flow:
//! fill the request, generate prompts, render the comic, download the
//! artifacts the server offers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use comicfactory_client::api::ComicFactoryApi;
use comicfactory_client::session::StudioSession;
use comicfactory_core::download::{filename_from_path, PDF_FILENAME, ZIP_FILENAME};
use comicfactory_core::request::{
    FIELD_CHARACTERS, FIELD_CHARACTER_NAMES, FIELD_GENRE, FIELD_SETTING,
};
use comicfactory_core::response::PanelPrompt;

use crate::config::ClientConfig;

// ---------------------------------------------------------------------------
// Command-line surface
// ---------------------------------------------------------------------------

/// Command-line client for the Comic Factory generation API.
#[derive(Debug, Parser)]
#[command(name = "comicfactory", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the API base URL from the environment.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override the download directory from the environment.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate illustration prompts from the comic parameters.
    Prompts(FormArgs),
    /// Render a comic from a saved prompt list and download the artifacts.
    Comic {
        /// JSON file holding the prompt list, as written by `prompts --save`.
        #[arg(long, value_name = "FILE")]
        prompts: PathBuf,
        /// Print the artifact URLs without downloading them.
        #[arg(long)]
        no_download: bool,
    },
    /// Run the full flow: prompts, comic, artifact downloads.
    Run(FormArgs),
    /// Download a single artifact by its server path.
    Download {
        /// Server-relative resource path, or an absolute URL.
        #[arg(long)]
        url: String,
        /// Local filename. Defaults to the last path segment.
        #[arg(long)]
        filename: Option<String>,
    },
    /// Check that the API server is reachable.
    Health,
}

/// Comic parameters shared by `prompts` and `run`.
///
/// Flags default to empty strings so that missing values are caught by the
/// pre-submission presence check and surface its banner message.
#[derive(Debug, Args)]
pub struct FormArgs {
    /// Comic genre, e.g. "Sci-Fi".
    #[arg(long, default_value = "")]
    pub genre: String,

    /// Story setting, e.g. "Space Station".
    #[arg(long, default_value = "")]
    pub setting: String,

    /// Character descriptions.
    #[arg(long, default_value = "")]
    pub characters: String,

    /// Character names.
    #[arg(long, default_value = "")]
    pub character_names: String,

    /// Dialogue line for the next panel. Repeat once per panel.
    #[arg(long = "dialogue", value_name = "LINE")]
    pub dialogues: Vec<String>,

    /// Save the generated prompt list as JSON.
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute the parsed command. The returned error carries the user-facing
/// banner text.
pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let api_url = cli.api_url.unwrap_or(config.api_url);
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(config.output_dir));
    tracing::debug!(api_url = %api_url, output_dir = %output_dir.display(), "Resolved client configuration");

    let api = ComicFactoryApi::with_timeout(&api_url, config.timeout_secs);

    match cli.command {
        Command::Prompts(args) => run_prompts(api, output_dir, args).await,
        Command::Comic {
            prompts,
            no_download,
        } => run_comic(api, output_dir, &prompts, no_download).await,
        Command::Run(args) => run_pipeline(api, output_dir, args).await,
        Command::Download { url, filename } => {
            run_download(api, output_dir, &url, filename).await
        }
        Command::Health => run_health(api).await,
    }
}

async fn run_prompts(
    api: ComicFactoryApi,
    output_dir: PathBuf,
    args: FormArgs,
) -> anyhow::Result<()> {
    let mut session = StudioSession::new(api, output_dir);
    apply_form(&mut session, &args)?;
    session.generate_prompts().await?;
    print_prompts(session.prompts());
    if let Some(path) = &args.save {
        save_prompts(path, session.prompts())?;
    }
    Ok(())
}

async fn run_comic(
    api: ComicFactoryApi,
    output_dir: PathBuf,
    prompts_file: &Path,
    no_download: bool,
) -> anyhow::Result<()> {
    let mut session = StudioSession::new(api, output_dir);
    session.set_prompts(load_prompts(prompts_file)?);
    session.generate_comic().await?;
    report_and_download(&mut session, no_download).await
}

async fn run_pipeline(
    api: ComicFactoryApi,
    output_dir: PathBuf,
    args: FormArgs,
) -> anyhow::Result<()> {
    let mut session = StudioSession::new(api, output_dir);
    apply_form(&mut session, &args)?;
    session.generate_prompts().await?;
    print_prompts(session.prompts());
    if let Some(path) = &args.save {
        save_prompts(path, session.prompts())?;
    }
    session.generate_comic().await?;
    report_and_download(&mut session, false).await
}

async fn run_download(
    api: ComicFactoryApi,
    output_dir: PathBuf,
    url: &str,
    filename: Option<String>,
) -> anyhow::Result<()> {
    let mut session = StudioSession::new(api, output_dir);
    let filename = filename.unwrap_or_else(|| filename_from_path(url));
    let dest = session.download(url, &filename).await?;
    println!("Saved {}", dest.display());
    Ok(())
}

async fn run_health(api: ComicFactoryApi) -> anyhow::Result<()> {
    let health = api.health().await?;
    println!("{}", health.message);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy the parsed flags into the session's request.
fn apply_form(session: &mut StudioSession, args: &FormArgs) -> anyhow::Result<()> {
    let request = session.request_mut();
    request.set_field(FIELD_GENRE, &args.genre)?;
    request.set_field(FIELD_SETTING, &args.setting)?;
    request.set_field(FIELD_CHARACTERS, &args.characters)?;
    request.set_field(FIELD_CHARACTER_NAMES, &args.character_names)?;
    for (panel, line) in args.dialogues.iter().enumerate() {
        request.set_dialogue(panel, line);
    }
    Ok(())
}

/// Print the prompts as a numbered list with the dialogue line under each
/// description.
fn print_prompts(prompts: &[PanelPrompt]) {
    println!("Generated prompts:");
    for (i, prompt) in prompts.iter().enumerate() {
        println!("{}. {}", i + 1, prompt.description);
        if !prompt.dialogue.is_empty() {
            println!("   \"{}\"", prompt.dialogue);
        }
    }
}

/// Print which artifacts the server offered and download them unless told
/// not to.
async fn report_and_download(
    session: &mut StudioSession,
    no_download: bool,
) -> anyhow::Result<()> {
    let (zip_url, pdf_url) = match session.last_response() {
        Some(response) => (response.zip_url.clone(), response.pdf_url.clone()),
        None => (None, None),
    };

    if zip_url.is_none() && pdf_url.is_none() {
        println!("The server offered no artifacts to download.");
        return Ok(());
    }

    if let Some(url) = zip_url {
        println!("ZIP bundle: {url}");
        if !no_download {
            let dest = session.download(&url, ZIP_FILENAME).await?;
            println!("Saved {}", dest.display());
        }
    }
    if let Some(url) = pdf_url {
        println!("PDF: {url}");
        if !no_download {
            let dest = session.download(&url, PDF_FILENAME).await?;
            println!("Saved {}", dest.display());
        }
    }
    Ok(())
}

fn save_prompts(path: &Path, prompts: &[PanelPrompt]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(prompts)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved {} prompts to {}", prompts.len(), path.display());
    Ok(())
}

fn load_prompts(path: &Path) -> anyhow::Result<Vec<PanelPrompt>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let prompts = serde_json::from_str(&json)
        .with_context(|| format!("{} does not hold a prompt list", path.display()))?;
    Ok(prompts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! `comicfactory` -- command-line client for the Comic Factory API.
//!
//! Drives the two-step generation flow: request illustration prompts for
//! a comic, render the comic from those prompts, then download the ZIP
//! and PDF artifacts the server offers.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default                 | Description                              |
//! |------------------------------|----------|-------------------------|------------------------------------------|
//! | `COMIC_FACTORY_API_URL`      | No       | `http://localhost:8000` | Base URL of the Comic Factory API        |
//! | `COMIC_FACTORY_TIMEOUT_SECS` | No       | `30`                    | Request timeout, except comic rendering  |
//! | `COMIC_FACTORY_OUTPUT_DIR`   | No       | `.`                     | Directory downloads are written into     |
//! | `RUST_LOG`                   | No       | `comicfactory_cli=info,comicfactory_client=info` | Log filter |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comicfactory_cli::commands::{self, Cli};
use comicfactory_cli::config::ClientConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comicfactory_cli=info,comicfactory_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    if let Err(err) = commands::run(cli, config).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

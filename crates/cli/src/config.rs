//! Client configuration loaded from environment variables.

use comicfactory_client::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Connection settings for the Comic Factory API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Comic Factory API server.
    pub api_url: String,
    /// Request timeout in seconds. Comic rendering keeps its own fixed
    /// 600 second timeout regardless of this value.
    pub timeout_secs: u64,
    /// Directory downloaded artifacts are written into.
    pub output_dir: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                     | Default                 |
    /// |------------------------------|-------------------------|
    /// | `COMIC_FACTORY_API_URL`      | `http://localhost:8000` |
    /// | `COMIC_FACTORY_TIMEOUT_SECS` | `30`                    |
    /// | `COMIC_FACTORY_OUTPUT_DIR`   | `.`                     |
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("COMIC_FACTORY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout_secs = std::env::var("COMIC_FACTORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .expect("COMIC_FACTORY_TIMEOUT_SECS must be a valid u64");

        let output_dir = std::env::var("COMIC_FACTORY_OUTPUT_DIR").unwrap_or_else(|_| ".".into());

        Self {
            api_url,
            timeout_secs,
            output_dir,
        }
    }
}

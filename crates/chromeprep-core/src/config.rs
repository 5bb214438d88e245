//! Source configuration for the acquisition pipeline.
//!
//! All distribution endpoints and overrides live here and are threaded by
//! value into the components that need them; nothing below this layer reads
//! the environment.

use std::time::Duration;

use reqwest::{redirect, Client};

/// Index publishing the latest known-good browser builds.
pub const DEFAULT_INDEX_BASE: &str = "https://googlechromelabs.github.io/chrome-for-testing";

/// Archive host for the primary distribution.
pub const DEFAULT_ARCHIVE_BASE: &str = "https://storage.googleapis.com/chrome-for-testing-public";

/// Archive host for the fallback chromium distribution.
pub const DEFAULT_FALLBACK_BASE: &str = "https://playwright.azureedge.net/builds/chromium";

const FETCH_TIMEOUT: Duration = Duration::from_secs(300);

/// Where and how browser builds are fetched.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub index_base: String,
    pub archive_base: String,
    pub fallback_base: String,
    /// Fallback build id override; the fixed default baseline applies when unset.
    pub fallback_build: Option<String>,
    /// Total-request bound on every fetch, so a hung transfer cannot block
    /// a build or a host startup indefinitely.
    pub fetch_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index_base: DEFAULT_INDEX_BASE.to_string(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
            fallback_base: DEFAULT_FALLBACK_BASE.to_string(),
            fallback_build: None,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

impl SourceConfig {
    pub fn with_fallback_build(mut self, build: Option<String>) -> Self {
        self.fallback_build = build;
        self
    }

    /// Build the HTTP client the whole pipeline shares. Automatic redirect
    /// following is disabled: the fetcher follows at most one hop itself.
    pub fn client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(self.fetch_timeout)
            .user_agent(crate::USER_AGENT)
            .build()
    }
}

//! Build resolution against the browser distribution sources.
//!
//! The primary distribution publishes a small JSON index naming the latest
//! known-good build per release channel; resolution means reading the Stable
//! channel version. The fallback distribution has no index at all — its
//! build id is a fixed baseline, overridable through configuration.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SourceConfig;
use crate::platform::BrowserPlatform;

/// Baseline fallback build, used when no override is configured.
const DEFAULT_FALLBACK_BUILD: &str = "1084";

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("the primary distribution publishes no build for this platform")]
    NoCompatibleBuild,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// An opaque version token identifying one browser build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct KnownGoodVersions {
    channels: Channels,
}

#[derive(Debug, Deserialize)]
struct Channels {
    #[serde(rename = "Stable")]
    stable: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    version: String,
}

/// Resolve the latest stable build of the primary distribution.
///
/// `platform` is `None` when the normalizer found no primary-distribution
/// vocabulary for the target; that is exactly the `NoCompatibleBuild` case,
/// and whether it routes to the fallback source is decided by the caller.
pub async fn resolve_latest(
    client: &Client,
    config: &SourceConfig,
    platform: Option<BrowserPlatform>,
) -> Result<(BrowserPlatform, BuildId), ResolveError> {
    let platform = platform.ok_or(ResolveError::NoCompatibleBuild)?;

    let url = format!(
        "{}/last-known-good-versions.json",
        config.index_base.trim_end_matches('/')
    );
    debug!(%platform, %url, "resolving latest stable build");

    let response = client.get(&url).send().await?.error_for_status()?;
    let index: KnownGoodVersions = response.json().await?;

    let build = BuildId::new(index.channels.stable.version);
    debug!(%build, "resolved stable build");
    Ok((platform, build))
}

/// The fallback build id: configured override, or the fixed baseline.
pub fn fallback_build(config: &SourceConfig) -> BuildId {
    match &config.fallback_build {
        Some(id) => BuildId::new(id.clone()),
        None => BuildId::new(DEFAULT_FALLBACK_BUILD),
    }
}

/// Archive URL for a primary build.
pub fn shell_archive_url(
    config: &SourceConfig,
    platform: BrowserPlatform,
    build: &BuildId,
) -> String {
    format!(
        "{}/{build}/{platform}/chrome-headless-shell-{platform}.zip",
        config.archive_base.trim_end_matches('/')
    )
}

/// Archive URL for a fallback build.
pub fn fallback_archive_url(config: &SourceConfig, build: &BuildId) -> String {
    format!(
        "{}/{build}/chromium-linux-arm64.zip",
        config.fallback_base.trim_end_matches('/')
    )
}

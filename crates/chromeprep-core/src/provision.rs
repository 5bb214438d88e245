//! Build-time acquisition flow: route a target to its distribution source,
//! fetch the archive, extract and locate the executable, persist metadata.
//!
//! Two routing decisions live here, deliberately outside the components
//! they steer: primary vs fallback source (the fallback covers exactly the
//! one target the primary distribution does not publish), and immediate vs
//! embed-only mode (selected by the reserved staging directory name).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::io::download::{self, FetchError};
use crate::io::extract::{self, ExecutableLocation, ExtractError};
use crate::metadata::{self, BrowserInfo};
use crate::paths;
use crate::platform::{Arch, Os, TargetDescriptor};
use crate::resolver::{self, BuildId, ResolveError};

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of one provisioning run.
#[derive(Debug)]
pub struct Provisioned {
    pub build: BuildId,
    pub info: BrowserInfo,
    /// Located executable; absent in embed-only mode, where the raw archive
    /// is kept for extraction at first run.
    pub executable: Option<ExecutableLocation>,
}

/// Whether `output_dir` is the reserved staging directory whose contents the
/// packager bundles into the distributable. Selecting it switches the flow
/// to embed-only mode.
pub fn is_embed_dir(output_dir: &Path) -> bool {
    output_dir.file_name().and_then(|name| name.to_str()) == Some(paths::EMBED_DIR)
}

/// Whether a target is served by the fallback distribution. The primary
/// source publishes no arm64 linux build, so that pair — and only that
/// pair — routes to the fallback.
pub fn uses_fallback(target: &TargetDescriptor) -> bool {
    target.os == Os::Linux && target.arch == Arch::Arm64
}

/// Provision a browser build for `target` into `output_dir`.
pub async fn provision(
    client: &Client,
    target: &TargetDescriptor,
    output_dir: &Path,
    config: &SourceConfig,
) -> Result<Provisioned, ProvisionError> {
    fs::create_dir_all(output_dir)?;
    let output_dir = fs::canonicalize(output_dir)?;

    if uses_fallback(target) {
        warn!(%target, "primary distribution has no build for this target, using fallback chromium");
        provision_fallback(client, &output_dir, config).await
    } else {
        provision_primary(client, target, &output_dir, config).await
    }
}

async fn provision_primary(
    client: &Client,
    target: &TargetDescriptor,
    output_dir: &Path,
    config: &SourceConfig,
) -> Result<Provisioned, ProvisionError> {
    let (platform, build) =
        resolver::resolve_latest(client, config, target.browser_platform()).await?;

    let install_dir = paths::shell_install_dir(output_dir, platform, &build);
    fs::create_dir_all(&install_dir)?;

    let url = resolver::shell_archive_url(config, platform, &build);
    let archive_path = install_dir.join(format!("{}.zip", paths::shell_archive_dir_name(platform)));
    info!(%url, dest = %archive_path.display(), "downloading browser archive");
    download::download(client, &url, &archive_path).await?;

    let located = {
        let archive = archive_path.clone();
        let dest = install_dir.clone();
        let archive_dir = paths::shell_archive_dir_name(platform);
        let exe_name = paths::shell_executable_name(platform);
        tokio::task::spawn_blocking(move || -> Result<ExecutableLocation, ExtractError> {
            extract::extract_zip(&archive, &dest)?;
            extract::locate_executable(&dest, exe_name, &[archive_dir.as_str()])
        })
        .await
        .map_err(io::Error::other)??
    };

    fs::remove_file(&archive_path)?;
    extract::ensure_executable_mode(&located.absolute)?;

    let info = BrowserInfo::Build {
        build_id: build.clone(),
    };
    metadata::write(output_dir, &info)?;

    info!(%build, executable = %located.absolute.display(), "browser provisioned");
    Ok(Provisioned {
        build,
        info,
        executable: Some(located),
    })
}

async fn provision_fallback(
    client: &Client,
    output_dir: &Path,
    config: &SourceConfig,
) -> Result<Provisioned, ProvisionError> {
    let source_build = resolver::fallback_build(config);
    let url = resolver::fallback_archive_url(config, &source_build);
    let archive_path = output_dir.join(paths::FALLBACK_ARCHIVE);
    info!(%url, dest = %archive_path.display(), "downloading fallback chromium archive");
    download::download(client, &url, &archive_path).await?;

    let build = BuildId::new(format!("playwright-{source_build}"));

    if is_embed_dir(output_dir) {
        info!(
            archive = %archive_path.display(),
            "keeping raw archive for embedding; extraction happens at first run"
        );
        let info = BrowserInfo::Build {
            build_id: build.clone(),
        };
        metadata::write(output_dir, &info)?;
        return Ok(Provisioned {
            build,
            info,
            executable: None,
        });
    }

    let located = {
        let archive = archive_path.clone();
        let dest = output_dir.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<ExecutableLocation, ExtractError> {
            extract::extract_zip(&archive, &dest)?;
            extract::locate_executable(
                &dest,
                paths::FALLBACK_EXECUTABLE,
                paths::FALLBACK_CANDIDATE_DIRS,
            )
        })
        .await
        .map_err(io::Error::other)??
    };

    fs::remove_file(&archive_path)?;
    extract::ensure_executable_mode(&located.absolute)?;

    // The fallback layout has no path-computation rule, so the sidecar
    // carries the explicit location.
    let info = BrowserInfo::Explicit {
        executable_path: located.absolute.clone(),
        executable_rel: located.relative.clone(),
    };
    metadata::write(output_dir, &info)?;

    info!(%build, executable = %located.absolute.display(), "fallback browser provisioned");
    Ok(Provisioned {
        build,
        info,
        executable: Some(located),
    })
}

/// Path of the fallback archive inside an output directory, for callers
/// that need to check for a pre-existing staged asset.
pub fn staged_archive_path(output_dir: &Path) -> PathBuf {
    output_dir.join(paths::FALLBACK_ARCHIVE)
}

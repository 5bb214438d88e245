//! Fetch command: provision a browser build for a target.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use chromeprep_core::provision::{self, Provisioned};
use chromeprep_core::{SourceConfig, TargetDescriptor};

use crate::ui::Output;

/// Download a browser build for `target` into `out_dir` (or the default
/// dist directory) and record how to find it.
///
/// When the output directory is the reserved staging name the raw archive
/// is kept for later embedding; in that mode a pre-existing archive is
/// treated as good enough if the download itself fails, so a flaky network
/// does not fail a packaging run that already has its asset.
pub async fn fetch(target: &str, out_dir: Option<PathBuf>, fallback_build: Option<String>) -> Result<()> {
    let ui = Output::new();
    let descriptor = TargetDescriptor::parse(target)?;
    let out_dir = out_dir.unwrap_or_else(|| crate::default_output_dir(target));

    let config = SourceConfig::default().with_fallback_build(fallback_build);
    let client = config.client().context("failed to build HTTP client")?;
    debug!(index = %config.index_base, archive = %config.archive_base, fallback = %config.fallback_base, "source configuration");

    let embed_only = provision::is_embed_dir(&out_dir);
    match provision::provision(&client, &descriptor, &out_dir, &config).await {
        Ok(done) => {
            report(ui, &out_dir, &done);
            Ok(())
        }
        Err(err) => {
            let staged = provision::staged_archive_path(&out_dir);
            if embed_only && provision::uses_fallback(&descriptor) && staged.is_file() {
                ui.warning(&format!(
                    "download failed ({err:#}); keeping existing archive at {}",
                    staged.display()
                ));
                return Ok(());
            }
            Err(err).with_context(|| format!("failed to provision browser for {descriptor}"))
        }
    }
}

fn report(ui: Output, out_dir: &Path, done: &Provisioned) {
    match &done.executable {
        Some(exe) => ui.success(&format!(
            "browser build {} ready at {}",
            done.build,
            exe.absolute.display()
        )),
        None => ui.success(&format!(
            "raw archive staged in {} for embedding",
            out_dir.display()
        )),
    }
}

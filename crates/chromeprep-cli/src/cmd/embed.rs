//! Embed command: stage the fallback archive for the packager to bundle.

use std::path::Path;

use anyhow::{Context, Result};

use chromeprep_core::{packaging, provision, TargetDescriptor};

use crate::ui::Output;

/// Populate the staging directory the packager bundles into the
/// distributable. Only the fallback target ships an embedded browser; for
/// every other target this logs and does nothing.
///
/// Best-effort by design: the runtime bootstrap degrades gracefully when no
/// asset was bundled, so a failure here is reported loudly but does not
/// fail the packaging run.
pub async fn embed(target: &str, staging_dir: &Path, fallback_build: Option<String>) -> Result<()> {
    let ui = Output::new();
    let descriptor = TargetDescriptor::parse(target)?;

    if !provision::uses_fallback(&descriptor) {
        ui.info(&format!(
            "no embedded browser asset required for {descriptor} (packager target {})",
            packaging::packager_target(&descriptor)
        ));
        return Ok(());
    }

    std::fs::create_dir_all(staging_dir)
        .with_context(|| format!("failed to create staging directory {}", staging_dir.display()))?;
    ui.info(&format!(
        "preparing embedded chromium archive in {}",
        staging_dir.display()
    ));

    if let Err(err) = super::fetch::fetch(target, Some(staging_dir.to_path_buf()), fallback_build).await
    {
        ui.warning(&format!("failed to prepare embedded browser asset: {err:#}"));
    }
    Ok(())
}

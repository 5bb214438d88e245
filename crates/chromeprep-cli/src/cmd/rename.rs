//! Rename command: apply the release naming convention to the packager output.

use std::path::PathBuf;

use anyhow::{Context, Result};

use chromeprep_core::{packaging, TargetDescriptor};

use crate::ui::Output;

pub fn rename(target: &str, out_dir: Option<PathBuf>) -> Result<()> {
    let ui = Output::new();
    let descriptor = TargetDescriptor::parse(target)?;
    let out_dir = out_dir.unwrap_or_else(|| crate::default_output_dir(target));

    let dest = packaging::rename_packaged_executable(&out_dir, &descriptor)
        .with_context(|| format!("failed to rename packager output in {}", out_dir.display()))?;

    ui.success(&format!("packager output renamed to {}", dest.display()));
    Ok(())
}

//! Post-packaging helpers: the release naming convention and the token pair
//! handed to the external executable packager.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths;
use crate::platform::{Os, TargetDescriptor};

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("expected packager output missing at {}", .0.display())]
    RenameFailed(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn executable_extension(target: &TargetDescriptor) -> &'static str {
    if target.os == Os::Windows {
        ".exe"
    } else {
        ""
    }
}

/// File name the released executable gets under the naming convention.
pub fn release_file_name(target: &TargetDescriptor) -> String {
    format!(
        "{}_{}_{}{}",
        paths::BUNDLE_BASE_NAME,
        target.naming_os(),
        target.naming_arch(),
        executable_extension(target)
    )
}

/// Rename the packager's output file in `output_dir` to its release name.
/// The packager is expected to have produced the fixed base name already;
/// its absence means the packaging step failed upstream.
pub fn rename_packaged_executable(
    output_dir: &Path,
    target: &TargetDescriptor,
) -> Result<PathBuf, PackageError> {
    let source = output_dir.join(format!(
        "{}{}",
        paths::BUNDLE_BASE_NAME,
        executable_extension(target)
    ));
    if !source.is_file() {
        return Err(PackageError::RenameFailed(source));
    }

    let dest = output_dir.join(release_file_name(target));
    fs::rename(&source, &dest)?;
    Ok(dest)
}

/// Target token pair the external packager expects, e.g. `macos-arm64`.
pub fn packager_target(target: &TargetDescriptor) -> String {
    format!("{}-{}", target.packager_platform(), target.packager_arch())
}

//! Zip extraction and browser executable discovery.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("no browser executable found under {}", .0.display())]
    ExecutableNotFound(PathBuf),
}

/// Where a located executable sits, both absolutely and relative to the
/// resolution root. The relative form is what survives relocation of the
/// whole directory to another machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableLocation {
    pub absolute: PathBuf,
    pub relative: PathBuf,
}

/// Extract a zip archive into `dest_dir`, creating it if absent. Unix file
/// modes stored in the archive are restored; entries that would escape
/// `dest_dir` are skipped.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Archive(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let mut extracted = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;
        let relative_path = match entry.enclosed_name() {
            Some(path) => path,
            None => continue,
        };

        if entry.is_dir() {
            fs::create_dir_all(dest_dir.join(&relative_path))?;
            continue;
        }

        let absolute_path = dest_dir.join(&relative_path);
        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode))?;
        }

        extracted += 1;
    }

    debug!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        files = extracted,
        "archive extracted"
    );
    Ok(())
}

/// Find the browser executable under `root`: first the known top-level
/// directory conventions, in order, then a scan of every first-level
/// subdirectory. Both passes coming up empty is fatal to the caller.
pub fn locate_executable(
    root: &Path,
    exe_name: &str,
    candidates: &[&str],
) -> Result<ExecutableLocation, ExtractError> {
    for dir in candidates {
        let candidate = root.join(dir).join(exe_name);
        if candidate.is_file() {
            return Ok(location(root, candidate));
        }
    }

    // Fallback: the archive used a directory name we have not seen before.
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let candidate = entry.path().join(exe_name);
            if candidate.is_file() {
                return Ok(location(root, candidate));
            }
        }
    }

    Err(ExtractError::ExecutableNotFound(root.to_path_buf()))
}

fn location(root: &Path, absolute: PathBuf) -> ExecutableLocation {
    let relative = absolute
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| absolute.clone());
    ExecutableLocation { absolute, relative }
}

/// Make sure a located executable is actually runnable; archives built on
/// other systems do not always carry the execute bit.
pub fn ensure_executable_mode(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

//! First-run bootstrap for packaged executables.
//!
//! A packaged build for the fallback target ships its browser as a raw
//! archive bundled next to the executable. This module unpacks it on first
//! start and records the result, so every later start is a cheap no-op. It
//! never touches the network.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::io::extract::{self, ExtractError};
use crate::metadata::{self, BrowserInfo};
use crate::paths;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Ensure a usable browser executable exists next to the packaged binary.
///
/// Idempotent and safe to call on every process start. `packaged` is
/// supplied by the caller (it knows how the process was distributed); when
/// false this is a no-op, as it is when the browser is already resolved or
/// when no embedded asset was bundled. A bundled asset that extracts to
/// nothing usable is fatal: the host cannot serve without a browser, so
/// failing at boot beats failing on the first request.
pub fn ensure_embedded_browser(exe_dir: &Path, packaged: bool) -> Result<(), BootstrapError> {
    if !packaged {
        return Ok(());
    }
    let exe_dir = fs::canonicalize(exe_dir)?;

    if let Some(info) = metadata::read(&exe_dir) {
        if let Some(path) = metadata::resolve_executable(&exe_dir, &info) {
            if path.is_file() {
                debug!(executable = %path.display(), "browser already resolved");
                return Ok(());
            }
        }
    }

    let asset = exe_dir.join(paths::EMBED_DIR).join(paths::FALLBACK_ARCHIVE);
    if !asset.is_file() {
        // Packaged with the primary distribution; resolution happened at
        // build time and there is nothing to unpack here.
        debug!("no embedded browser asset bundled with this build");
        return Ok(());
    }

    let archive = exe_dir.join(paths::FALLBACK_ARCHIVE);
    if !archive.is_file() {
        fs::copy(&asset, &archive)?;
    }

    // Unpack into a uniquely-named staging directory and move the finished
    // tree into place, so a concurrent first run never observes a
    // half-written executable under the final name.
    let staging = tempfile::Builder::new()
        .prefix(".chromeprep-")
        .tempdir_in(&exe_dir)?;
    extract::extract_zip(&archive, staging.path())?;
    let located = extract::locate_executable(
        staging.path(),
        paths::FALLBACK_EXECUTABLE,
        paths::FALLBACK_CANDIDATE_DIRS,
    )?;

    let top: PathBuf = match located.relative.components().next() {
        Some(component) => PathBuf::from(component.as_os_str()),
        None => return Err(ExtractError::ExecutableNotFound(exe_dir.clone()).into()),
    };
    let source = staging.path().join(&top);
    let dest = exe_dir.join(&top);
    if !dest.exists() {
        if let Err(err) = fs::rename(&source, &dest) {
            // Lost the race to another process; its completed tree wins.
            if !dest.exists() {
                return Err(err.into());
            }
        }
    }

    let located = extract::locate_executable(
        &exe_dir,
        paths::FALLBACK_EXECUTABLE,
        paths::FALLBACK_CANDIDATE_DIRS,
    )?;
    extract::ensure_executable_mode(&located.absolute)?;

    let info = BrowserInfo::Explicit {
        executable_path: located.absolute.clone(),
        executable_rel: located.relative.clone(),
    };
    metadata::write(&exe_dir, &info)?;

    info!(executable = %located.absolute.display(), "embedded browser extracted");
    Ok(())
}

/// The browser executable a host process should use, if the sidecar next to
/// it names one that exists on disk.
pub fn browser_executable(exe_dir: &Path) -> Option<PathBuf> {
    let info = metadata::read(exe_dir)?;
    let path = metadata::resolve_executable(exe_dir, &info)?;
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_fixture_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn plant_embedded_asset(exe_dir: &Path, entries: &[(&str, &str)]) {
        let embed_dir = exe_dir.join(paths::EMBED_DIR);
        fs::create_dir_all(&embed_dir).unwrap();
        write_fixture_zip(&embed_dir.join(paths::FALLBACK_ARCHIVE), entries);
    }

    #[test]
    fn test_noop_when_not_packaged() {
        let dir = tempdir().unwrap();
        plant_embedded_asset(dir.path(), &[("chrome-linux/chrome", "binary")]);

        ensure_embedded_browser(dir.path(), false).unwrap();
        assert!(!dir.path().join("chrome-linux").exists());
        assert!(metadata::read(dir.path()).is_none());
    }

    #[test]
    fn test_noop_without_embedded_asset() {
        let dir = tempdir().unwrap();
        ensure_embedded_browser(dir.path(), true).unwrap();
        assert!(metadata::read(dir.path()).is_none());
    }

    #[test]
    fn test_noop_when_sidecar_already_resolves() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("chrome-linux/chrome");
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "binary").unwrap();
        metadata::write(
            dir.path(),
            &BrowserInfo::Explicit {
                executable_path: exe,
                executable_rel: PathBuf::from("chrome-linux/chrome"),
            },
        )
        .unwrap();
        // An asset is present, but the sidecar short-circuits before it.
        plant_embedded_asset(dir.path(), &[("chrome-linux/chrome", "binary")]);

        ensure_embedded_browser(dir.path(), true).unwrap();
        assert!(!dir.path().join(paths::FALLBACK_ARCHIVE).exists());
    }

    #[test]
    fn test_first_run_extracts_and_persists() {
        let dir = tempdir().unwrap();
        plant_embedded_asset(
            dir.path(),
            &[
                ("chrome-linux/chrome", "chromium binary"),
                ("chrome-linux/icudtl.dat", "icu data"),
            ],
        );

        ensure_embedded_browser(dir.path(), true).unwrap();
        let exe_dir = fs::canonicalize(dir.path()).unwrap();

        // Archive copied next to the executable, tree extracted.
        assert!(exe_dir.join(paths::FALLBACK_ARCHIVE).is_file());
        assert!(exe_dir.join("chrome-linux/chrome").is_file());

        match metadata::read(&exe_dir) {
            Some(BrowserInfo::Explicit {
                executable_path,
                executable_rel,
            }) => {
                assert!(executable_path.is_file());
                assert!(exe_dir.join(&executable_rel).is_file());
                assert_eq!(executable_rel, PathBuf::from("chrome-linux/chrome"));
            }
            other => panic!("expected explicit sidecar, got {other:?}"),
        }

        // No staging leftovers.
        let stray: Vec<_> = fs::read_dir(&exe_dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".chromeprep-"))
            .collect();
        assert!(stray.is_empty());
    }

    #[test]
    fn test_second_run_is_noop() {
        let dir = tempdir().unwrap();
        plant_embedded_asset(dir.path(), &[("chrome-linux/chrome", "chromium binary")]);

        ensure_embedded_browser(dir.path(), true).unwrap();
        let exe_dir = fs::canonicalize(dir.path()).unwrap();
        let sidecar = exe_dir.join(paths::BROWSER_INFO_FILE);
        let before = fs::read(&sidecar).unwrap();

        // Corrupt the asset: a second run must not look at it again.
        fs::write(
            exe_dir.join(paths::EMBED_DIR).join(paths::FALLBACK_ARCHIVE),
            b"garbage",
        )
        .unwrap();

        ensure_embedded_browser(dir.path(), true).unwrap();
        assert_eq!(fs::read(&sidecar).unwrap(), before);
    }

    #[test]
    fn test_asset_without_executable_is_fatal() {
        let dir = tempdir().unwrap();
        plant_embedded_asset(dir.path(), &[("chrome-linux/readme.txt", "nothing runnable")]);

        let err = ensure_embedded_browser(dir.path(), true).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Extract(ExtractError::ExecutableNotFound(_))
        ));
    }

    #[test]
    fn test_unlisted_directory_name_still_bootstraps() {
        let dir = tempdir().unwrap();
        plant_embedded_asset(dir.path(), &[("chromium-new-layout/chrome", "binary")]);

        ensure_embedded_browser(dir.path(), true).unwrap();
        let exe_dir = fs::canonicalize(dir.path()).unwrap();
        assert!(exe_dir.join("chromium-new-layout/chrome").is_file());
    }

    #[test]
    fn test_browser_executable_reads_sidecar() {
        let dir = tempdir().unwrap();
        assert_eq!(browser_executable(dir.path()), None);

        let exe = dir.path().join("chrome-linux/chrome");
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "binary").unwrap();
        metadata::write(
            dir.path(),
            &BrowserInfo::Explicit {
                executable_path: exe.clone(),
                executable_rel: PathBuf::from("chrome-linux/chrome"),
            },
        )
        .unwrap();

        assert_eq!(browser_executable(dir.path()), Some(exe));
    }

    #[test]
    fn test_stale_sidecar_triggers_reextraction() {
        let dir = tempdir().unwrap();
        // Sidecar from a previous install whose tree is gone.
        metadata::write(
            dir.path(),
            &BrowserInfo::Explicit {
                executable_path: PathBuf::from("/nonexistent/chrome-linux/chrome"),
                executable_rel: PathBuf::from("chrome-linux/chrome"),
            },
        )
        .unwrap();
        plant_embedded_asset(dir.path(), &[("chrome-linux/chrome", "binary")]);

        ensure_embedded_browser(dir.path(), true).unwrap();
        let exe_dir = fs::canonicalize(dir.path()).unwrap();
        assert!(exe_dir.join("chrome-linux/chrome").is_file());
    }
}

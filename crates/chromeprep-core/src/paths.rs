//! Fixed names and on-disk layout rules shared across the pipeline.

use std::path::{Path, PathBuf};

use crate::platform::BrowserPlatform;
use crate::resolver::BuildId;

/// Metadata sidecar written next to a provisioned browser.
pub const BROWSER_INFO_FILE: &str = "chrome-info.json";

/// Reserved staging directory name; an output directory with this name
/// selects embed-only mode, and the packaged executable looks for its
/// bundled archive under a directory of the same name.
pub const EMBED_DIR: &str = "embedded_browser";

/// File name of the fallback chromium archive.
pub const FALLBACK_ARCHIVE: &str = "chromium-linux-arm64.zip";

/// Executable name inside the fallback archive.
pub const FALLBACK_EXECUTABLE: &str = "chrome";

/// Top-level directory names the fallback archive has been observed to use.
pub const FALLBACK_CANDIDATE_DIRS: &[&str] =
    &["chrome-linux", "chromium-linux-arm64", "chrome-linux-arm64"];

/// Base name of the file the executable packager produces.
pub const BUNDLE_BASE_NAME: &str = "renderer";

const HEADLESS_SHELL: &str = "chrome-headless-shell";

/// Directory one primary build installs into: `{root}/chrome-headless-shell/{platform}-{build}`.
pub fn shell_install_dir(root: &Path, platform: BrowserPlatform, build: &BuildId) -> PathBuf {
    root.join(HEADLESS_SHELL)
        .join(format!("{platform}-{build}"))
}

/// Top-level directory name inside a primary archive.
pub fn shell_archive_dir_name(platform: BrowserPlatform) -> String {
    format!("{HEADLESS_SHELL}-{platform}")
}

/// Executable file name for a primary build.
pub fn shell_executable_name(platform: BrowserPlatform) -> &'static str {
    if platform.is_windows() {
        "chrome-headless-shell.exe"
    } else {
        "chrome-headless-shell"
    }
}

/// The well-known path of a primary build's executable under a resolution
/// directory. This is the rule the `buildId` sidecar form relies on.
pub fn computed_executable_path(root: &Path, platform: BrowserPlatform, build: &BuildId) -> PathBuf {
    shell_install_dir(root, platform, build)
        .join(shell_archive_dir_name(platform))
        .join(shell_executable_name(platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_executable_path_layout() {
        let path = computed_executable_path(
            Path::new("/opt/renderer"),
            BrowserPlatform::Linux64,
            &BuildId::new("125.0.6422.60"),
        );
        assert_eq!(
            path,
            Path::new(
                "/opt/renderer/chrome-headless-shell/linux64-125.0.6422.60/chrome-headless-shell-linux64/chrome-headless-shell"
            )
        );
    }

    #[test]
    fn test_windows_executable_has_exe_suffix() {
        let path = computed_executable_path(
            Path::new("C:/renderer"),
            BrowserPlatform::Win64,
            &BuildId::new("125.0.6422.60"),
        );
        assert!(path.to_string_lossy().ends_with("chrome-headless-shell.exe"));
    }

    #[test]
    fn test_shell_archive_dir_name() {
        assert_eq!(
            shell_archive_dir_name(BrowserPlatform::MacArm64),
            "chrome-headless-shell-mac-arm64"
        );
    }
}

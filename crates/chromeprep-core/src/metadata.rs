//! The `chrome-info.json` sidecar recording how to find the resolved
//! browser executable.
//!
//! The file is advisory: the host re-checks the path it names on every
//! startup, and an unreadable file is treated the same as a missing one.
//! It is always rewritten whole, never patched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paths::{self, BROWSER_INFO_FILE};
use crate::platform::TargetDescriptor;
use crate::resolver::BuildId;

/// One of the two sidecar shapes. The explicit form is used where no
/// path-computation rule exists (the fallback distribution); the build-id
/// form relies on the primary distribution's cache layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrowserInfo {
    #[serde(rename_all = "camelCase")]
    Explicit {
        executable_path: PathBuf,
        executable_rel: PathBuf,
    },
    #[serde(rename_all = "camelCase")]
    Build { build_id: BuildId },
}

/// Write the sidecar into `dir`, replacing any previous content.
pub fn write(dir: &Path, info: &BrowserInfo) -> io::Result<()> {
    let payload = serde_json::to_vec(info).map_err(io::Error::other)?;
    fs::write(dir.join(BROWSER_INFO_FILE), payload)
}

/// Read the sidecar from `dir`. A missing or unparseable file is a cache
/// miss, not an error.
pub fn read(dir: &Path) -> Option<BrowserInfo> {
    let path = dir.join(BROWSER_INFO_FILE);
    let raw = fs::read(&path).ok()?;
    match serde_json::from_slice(&raw) {
        Ok(info) => Some(info),
        Err(err) => {
            debug!(path = %path.display(), %err, "ignoring unreadable browser metadata");
            None
        }
    }
}

/// The executable path the sidecar names, resolved against `dir`.
///
/// The explicit absolute path wins when it still exists; otherwise the
/// relative form is resolved against `dir`, which is what makes a relocated
/// directory work. A build id only resolves on hosts whose platform has a
/// cache-layout rule; callers must still check the returned path exists
/// before trusting it.
pub fn resolve_executable(dir: &Path, info: &BrowserInfo) -> Option<PathBuf> {
    match info {
        BrowserInfo::Explicit {
            executable_path,
            executable_rel,
        } => {
            if executable_path.is_file() {
                Some(executable_path.clone())
            } else {
                Some(dir.join(executable_rel))
            }
        }
        BrowserInfo::Build { build_id } => {
            let platform = TargetDescriptor::host()?.browser_platform()?;
            Some(paths::computed_executable_path(dir, platform, build_id))
        }
    }
}

//! Target platform and architecture normalization.
//!
//! A build target is described by a `{os}-{arch}` pair (e.g. `linux-arm64`).
//! Three downstream consumers each speak their own vocabulary for the same
//! pair: the browser distribution, the executable packager, and the released
//! file naming convention. Each context gets its own lookup; they are never
//! conflated.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetError {
    #[error("invalid target descriptor '{0}': expected {{os}}-{{arch}}, e.g. linux-x64")]
    InvalidTarget(String),
}

/// Operating system token of a target descriptor.
///
/// `alpine` is the musl-linux variant; it behaves as linux everywhere except
/// the packager-platform context, which has its own token for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Alpine,
    Darwin,
    Windows,
}

impl Os {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "linux" => Some(Self::Linux),
            "alpine" => Some(Self::Alpine),
            "darwin" => Some(Self::Darwin),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// The descriptor token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Alpine => "alpine",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture token of a target descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    X86,
    Arm,
    Arm64,
}

impl Arch {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "x64" => Some(Self::X64),
            "x86" => Some(Self::X86),
            "arm" => Some(Self::Arm),
            "arm64" => Some(Self::Arm64),
            _ => None,
        }
    }

    /// The descriptor token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform vocabulary of the primary browser distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserPlatform {
    Linux64,
    MacX64,
    MacArm64,
    Win32,
    Win64,
}

impl BrowserPlatform {
    /// Token used in distribution URLs and the cache layout.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux64 => "linux64",
            Self::MacX64 => "mac-x64",
            Self::MacArm64 => "mac-arm64",
            Self::Win32 => "win32",
            Self::Win64 => "win64",
        }
    }

    /// Whether executables for this platform carry an `.exe` suffix.
    pub fn is_windows(self) -> bool {
        matches!(self, Self::Win32 | Self::Win64)
    }
}

impl fmt::Display for BrowserPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `{os}-{arch}` build target.
///
/// # Example
///
/// ```
/// use chromeprep_core::platform::TargetDescriptor;
///
/// let target = TargetDescriptor::parse("darwin-arm64").unwrap();
/// assert_eq!(target.to_string(), "darwin-arm64");
/// assert!(TargetDescriptor::parse("darwin").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDescriptor {
    pub os: Os,
    pub arch: Arch,
}

impl TargetDescriptor {
    /// Parse a descriptor string. The input must split into exactly two
    /// non-empty tokens, both within the known vocabularies; anything else
    /// is a configuration error, not a silent default.
    pub fn parse(descriptor: &str) -> Result<Self, TargetError> {
        let invalid = || TargetError::InvalidTarget(descriptor.to_string());
        let mut parts = descriptor.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(os), Some(arch), None) => {
                let os = Os::from_token(os).ok_or_else(invalid)?;
                let arch = Arch::from_token(arch).ok_or_else(invalid)?;
                Ok(Self { os, arch })
            }
            _ => Err(invalid()),
        }
    }

    /// The descriptor of the machine this process is running on, if it maps
    /// into the known vocabulary.
    pub fn host() -> Option<Self> {
        let os = if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::Darwin
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            return None;
        };
        let arch = if cfg!(target_arch = "x86_64") {
            Arch::X64
        } else if cfg!(target_arch = "x86") {
            Arch::X86
        } else if cfg!(target_arch = "aarch64") {
            Arch::Arm64
        } else if cfg!(target_arch = "arm") {
            Arch::Arm
        } else {
            return None;
        };
        Some(Self { os, arch })
    }

    /// Platform in the primary distribution's vocabulary, or `None` for
    /// pairs it publishes no build for (arm linux).
    pub fn browser_platform(&self) -> Option<BrowserPlatform> {
        match (self.os, self.arch) {
            (Os::Windows, Arch::X64) => Some(BrowserPlatform::Win64),
            (Os::Windows, _) => Some(BrowserPlatform::Win32),
            (Os::Darwin, Arch::Arm64) => Some(BrowserPlatform::MacArm64),
            (Os::Darwin, _) => Some(BrowserPlatform::MacX64),
            (Os::Linux | Os::Alpine, Arch::X64 | Arch::X86) => Some(BrowserPlatform::Linux64),
            (Os::Linux | Os::Alpine, Arch::Arm | Arch::Arm64) => None,
        }
    }

    /// Platform token in the executable packager's vocabulary.
    pub fn packager_platform(&self) -> &'static str {
        match self.os {
            Os::Darwin => "macos",
            Os::Windows => "win",
            Os::Linux => "linux",
            Os::Alpine => "alpine",
        }
    }

    /// Architecture token in the executable packager's vocabulary.
    pub fn packager_arch(&self) -> &'static str {
        // The packager only ships arm64 binaries for macOS.
        if self.os == Os::Darwin && matches!(self.arch, Arch::Arm | Arch::Arm64) {
            return "arm64";
        }
        match self.arch {
            // Historical packager token; downstream consumers expect it verbatim.
            Arch::X86 => "x84",
            Arch::Arm => "armv6",
            Arch::Arm64 => "arm64",
            Arch::X64 => "x64",
        }
    }

    /// OS token in the released-file naming convention.
    pub fn naming_os(&self) -> &'static str {
        match self.os {
            Os::Windows => "windows",
            Os::Alpine => "linux",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }

    /// Architecture token in the released-file naming convention. Only the
    /// Intel tokens are remapped; arm variants pass through.
    pub fn naming_arch(&self) -> &'static str {
        match self.arch {
            Arch::X64 => "amd64",
            Arch::X86 => "386",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(descriptor: &str) -> TargetDescriptor {
        TargetDescriptor::parse(descriptor).unwrap()
    }

    #[test]
    fn test_parse_known_pairs() {
        assert_eq!(target("linux-x64").os, Os::Linux);
        assert_eq!(target("linux-x64").arch, Arch::X64);
        assert_eq!(target("alpine-arm64").os, Os::Alpine);
        assert_eq!(target("windows-x86").arch, Arch::X86);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(TargetDescriptor::parse("linux").is_err());
        assert!(TargetDescriptor::parse("linux-").is_err());
        assert!(TargetDescriptor::parse("-x64").is_err());
        assert!(TargetDescriptor::parse("linux-x64-unknown").is_err());
        assert!(TargetDescriptor::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert!(TargetDescriptor::parse("sunos-x64").is_err());
        assert!(TargetDescriptor::parse("linux-mips").is_err());
        assert!(TargetDescriptor::parse("win32-x64").is_err());
    }

    #[test]
    fn test_browser_platform_table() {
        assert_eq!(
            target("windows-x64").browser_platform(),
            Some(BrowserPlatform::Win64)
        );
        assert_eq!(
            target("windows-x86").browser_platform(),
            Some(BrowserPlatform::Win32)
        );
        assert_eq!(
            target("darwin-arm64").browser_platform(),
            Some(BrowserPlatform::MacArm64)
        );
        assert_eq!(
            target("darwin-x64").browser_platform(),
            Some(BrowserPlatform::MacX64)
        );
        assert_eq!(
            target("linux-x64").browser_platform(),
            Some(BrowserPlatform::Linux64)
        );
        assert_eq!(target("linux-arm64").browser_platform(), None);
        assert_eq!(target("linux-arm").browser_platform(), None);
        assert_eq!(target("alpine-arm64").browser_platform(), None);
    }

    #[test]
    fn test_packager_platform_table() {
        assert_eq!(target("darwin-x64").packager_platform(), "macos");
        assert_eq!(target("windows-x64").packager_platform(), "win");
        assert_eq!(target("linux-x64").packager_platform(), "linux");
        assert_eq!(target("alpine-x64").packager_platform(), "alpine");
    }

    #[test]
    fn test_packager_arch_table() {
        // "x84" is the token the packager actually consumes, mislabel and all.
        assert_eq!(target("linux-x86").packager_arch(), "x84");
        assert_eq!(target("linux-arm").packager_arch(), "armv6");
        assert_eq!(target("linux-arm64").packager_arch(), "arm64");
        assert_eq!(target("linux-x64").packager_arch(), "x64");
    }

    #[test]
    fn test_packager_arch_forced_on_macos() {
        assert_eq!(target("darwin-arm").packager_arch(), "arm64");
        assert_eq!(target("darwin-arm64").packager_arch(), "arm64");
        assert_eq!(target("darwin-x64").packager_arch(), "x64");
    }

    #[test]
    fn test_naming_os_table() {
        assert_eq!(target("windows-x64").naming_os(), "windows");
        assert_eq!(target("alpine-x64").naming_os(), "linux");
        assert_eq!(target("linux-x64").naming_os(), "linux");
        assert_eq!(target("darwin-x64").naming_os(), "darwin");
    }

    #[test]
    fn test_naming_arch_table() {
        assert_eq!(target("linux-x64").naming_arch(), "amd64");
        assert_eq!(target("linux-x86").naming_arch(), "386");
        // arm variants intentionally have no entry and pass through.
        assert_eq!(target("linux-arm").naming_arch(), "arm");
        assert_eq!(target("linux-arm64").naming_arch(), "arm64");
    }

    #[test]
    fn test_display_roundtrip() {
        for descriptor in ["linux-x64", "darwin-arm64", "windows-x86", "alpine-arm"] {
            assert_eq!(target(descriptor).to_string(), descriptor);
        }
    }

    #[test]
    fn test_browser_platform_tokens() {
        assert_eq!(BrowserPlatform::Linux64.as_str(), "linux64");
        assert_eq!(BrowserPlatform::MacArm64.as_str(), "mac-arm64");
        assert_eq!(BrowserPlatform::MacX64.as_str(), "mac-x64");
        assert_eq!(BrowserPlatform::Win32.as_str(), "win32");
        assert_eq!(BrowserPlatform::Win64.as_str(), "win64");
        assert!(BrowserPlatform::Win64.is_windows());
        assert!(!BrowserPlatform::Linux64.is_windows());
    }
}

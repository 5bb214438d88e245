//! chromeprep - browser provisioning CLI
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Build-time tooling around `chromeprep-core`: fetch a browser build for a
//! target, stage the embedded archive the packager bundles for the one
//! target the primary distribution does not cover, and rename the packager
//! output per the release naming convention.

pub mod cmd;
pub mod ui;

pub use chromeprep_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chromeprep")]
#[command(author, version, about = "chromeprep - headless browser provisioning for packaged renderer builds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download a browser build for a target and record how to find it
    Fetch {
        /// Target descriptor, e.g. linux-x64 or darwin-arm64
        target: String,
        /// Output directory; the reserved name `embedded_browser` keeps the
        /// raw archive for packaging instead of extracting it
        output: Option<PathBuf>,
        /// Override the fallback chromium build id
        #[arg(long, env = "PLAYWRIGHT_CHROMIUM_BUILDID")]
        fallback_build: Option<String>,
    },
    /// Stage the embedded browser archive before packaging (linux-arm64 only)
    Embed {
        /// Target descriptor
        target: String,
        /// Staging directory the packager bundles into the distributable
        #[arg(long, default_value = "embedded_browser")]
        staging_dir: PathBuf,
        /// Override the fallback chromium build id
        #[arg(long, env = "PLAYWRIGHT_CHROMIUM_BUILDID")]
        fallback_build: Option<String>,
    },
    /// Rename the packager's output per the release naming convention
    Rename {
        /// Target descriptor
        target: String,
        /// Directory holding the packager output
        output: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Default build output directory for a target descriptor.
pub fn default_output_dir(target: &str) -> PathBuf {
    PathBuf::from("dist").join(format!("renderer-{target}"))
}

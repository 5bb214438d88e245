//! chromeprep - headless browser acquisition and embedding for packaged
//! renderer builds.
//!
//! A render service needs a headless browser binary next to it, whether it
//! runs from an installed tree or as a single relocatable packaged
//! executable. This crate provides the pipeline that gets one there:
//!
//! - [`platform`] normalizes a `{os}-{arch}` target into the vocabularies
//!   of the browser distribution, the executable packager, and the release
//!   naming convention.
//! - [`resolver`] picks the concrete build to fetch, [`io::download`]
//!   fetches it, [`io::extract`] unpacks it and finds the executable.
//! - [`metadata`] persists how to find the executable again in a
//!   `chrome-info.json` sidecar.
//! - [`provision`] wires those into the build-time flow, including the
//!   embed-only mode that stages a raw archive for the packager to bundle.
//! - [`bootstrap`] is the runtime side: on first start of a packaged
//!   executable it unpacks the bundled archive and records the result.
//! - [`packaging`] applies the release naming convention after packaging.

pub mod bootstrap;
pub mod config;
pub mod io;
pub mod metadata;
pub mod packaging;
pub mod paths;
pub mod platform;
pub mod provision;
pub mod resolver;

pub use config::SourceConfig;
pub use platform::TargetDescriptor;

/// User Agent string for pipeline requests
pub const USER_AGENT: &str = concat!("chromeprep/", env!("CARGO_PKG_VERSION"));

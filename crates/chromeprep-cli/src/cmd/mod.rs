//! CLI command implementations.

pub mod completions;
pub mod embed;
pub mod fetch;
pub mod rename;

//! Console output for command results.
//!
//! The library layer reports through `tracing`; user-facing command
//! messaging goes through this handle so the two streams stay distinct.

/// Handle for user-facing console messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Prints an informational message to the console.
    pub fn info(&self, msg: &str) {
        println!("  {msg}");
    }

    /// Prints a success message to the console.
    pub fn success(&self, msg: &str) {
        println!("✓ {msg}");
    }

    /// Prints a warning message to the console.
    pub fn warning(&self, msg: &str) {
        eprintln!("! {msg}");
    }

    /// Prints an error message to the console.
    pub fn error(&self, msg: &str) {
        eprintln!("✗ {msg}");
    }
}

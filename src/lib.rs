//! Bolt - a minimal build-task orchestrator
//!
//! Bolt discovers tasks (built-in core tasks and script files in a project's
//! task directory), resolves their declared dependencies and runs each task
//! at most once per invocation, in dependency order.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod runner;

// Re-export commonly used types
pub use error::{BoltError, Result};

/// Current version of Bolt
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

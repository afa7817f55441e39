//! Task discovery
//!
//! This module parses task file headers, defines the core tasks and builds
//! the name → task registry used by the runner.

pub mod builtin;
pub mod discover;
pub mod metadata;
pub mod task;

// Re-export main types
pub use builtin::*;
pub use discover::*;
pub use metadata::*;
pub use task::*;

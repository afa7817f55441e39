//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, task dispatch, task listing,
//! task scaffolding and shell completion.

pub mod app;
pub mod dispatch;
pub mod logging;
pub mod scaffold;

// Re-export main types
pub use app::*;
pub use dispatch::*;
pub use logging::*;
pub use scaffold::*;

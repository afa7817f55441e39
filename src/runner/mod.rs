//! Task execution engine
//!
//! This module handles dependency resolution, script execution, path
//! validation and the execution context.

pub mod context;
pub mod executor;
pub mod outline;
pub mod script;
pub mod security;

// Re-export main types
pub use context::*;
pub use executor::*;
pub use outline::*;
pub use script::*;

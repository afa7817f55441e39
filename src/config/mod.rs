//! Configuration parsing and validation
//!
//! This module handles parsing of bolt.yml configuration files,
//! project root discovery and validation of configuration structure.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;

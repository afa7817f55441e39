//! Error types for Bolt

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Bolt operations
pub type Result<T> = std::result::Result<T, BoltError>;

/// Main error type for Bolt
#[derive(Error, Debug)]
pub enum BoltError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Path validation errors outside of a task (e.g. the task directory)
    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    /// Command line parsing errors
    #[error("Invalid arguments\n{0}")]
    Usage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load env file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },

    #[error("Invalid task name '{name}': {reason}")]
    InvalidTaskName { name: String, reason: String },

    #[error("Task file already exists: {0}")]
    TaskFileExists(PathBuf),
}

/// Errors raised while reading a task file header.
///
/// These never abort registry construction; the offending file is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("invalid task name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("TASK header declares no names")]
    EmptyTaskList,

    #[error("cannot derive a task name from file name '{0}'")]
    UnnamedFile(String),
}

/// Path validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("path '{path}' contains forbidden character {ch:?}")]
    ForbiddenCharacter { path: String, ch: char },

    #[error("path '{path}' resolves outside project root '{root}'")]
    OutsideProjectRoot { path: PathBuf, root: PathBuf },

    #[error("cannot resolve path '{path}': {error}")]
    Unresolvable { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Path security violation: {0}")]
    PathSecurity(#[from] SecurityError),

    #[error("Task '{task}' aborted: dependency '{dependency}' failed: {source}")]
    DependencyFailed {
        task: String,
        dependency: String,
        #[source]
        source: Box<ExecutionError>,
    },

    #[error("Task '{task}' failed: {}", exit_status_text(.code))]
    ProcessFailed { task: String, code: Option<i32> },

    #[error("Failed to start task '{task}': {error}")]
    Spawn { task: String, error: String },

    #[error("No interpreter configured for script '{0}'")]
    NoInterpreter(PathBuf),

    #[error("Task '{task}' failed: {message}")]
    Builtin { task: String, message: String },

    #[error("Circular dependency detected: {0}")]
    CycleDetected(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for metadata parsing
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Specialized result type for path validation
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

fn exit_status_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl ExecutionError {
    /// Walk through `DependencyFailed` wrappers to the error that started it
    pub fn root_cause(&self) -> &ExecutionError {
        match self {
            ExecutionError::DependencyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

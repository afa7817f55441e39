//! Core configuration types
//!
//! This module defines the data structures that represent a bolt.yml configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default directory scanned for project tasks
pub const DEFAULT_TASK_DIRECTORY: &str = ".build";

/// Default dotenv file exported to project task scripts
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding project task scripts, relative to the project root
    #[serde(default = "default_task_directory")]
    pub task_directory: String,

    /// Interpreter argv prefix per script extension
    #[serde(default = "default_interpreters")]
    pub interpreters: BTreeMap<String, Vec<String>>,

    /// File name patterns marking test files that are never tasks
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Dotenv file exported to project tasks, relative to the project root
    #[serde(default = "default_env_file")]
    pub env_file: String,

    /// Fail on dependency cycles instead of treating the revisit as satisfied
    #[serde(default)]
    pub strict_cycles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            task_directory: default_task_directory(),
            interpreters: default_interpreters(),
            exclude: default_exclude(),
            env_file: default_env_file(),
            strict_cycles: false,
        }
    }
}

impl Config {
    /// Interpreter for a script extension, if the extension is a task script type
    pub fn interpreter_for(&self, extension: &str) -> Option<&[String]> {
        self.interpreters.get(extension).map(Vec::as_slice)
    }
}

fn default_task_directory() -> String {
    DEFAULT_TASK_DIRECTORY.to_string()
}

fn default_env_file() -> String {
    DEFAULT_ENV_FILE.to_string()
}

fn default_interpreters() -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    map.insert("sh".to_string(), vec!["sh".to_string()]);
    map.insert("bash".to_string(), vec!["bash".to_string()]);
    map.insert(
        "ps1".to_string(),
        ["pwsh", "-NoProfile", "-NonInteractive", "-File"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    map
}

fn default_exclude() -> Vec<String> {
    ["*.Tests.*", "*.tests.*", "*.test.*", "*_test.*"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.task_directory, ".build");
        assert_eq!(config.env_file, ".env");
        assert!(!config.strict_cycles);
        assert_eq!(config.interpreter_for("sh"), Some(&["sh".to_string()][..]));
        assert!(config.interpreter_for("txt").is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("task_directory: tasks\n").unwrap();
        assert_eq!(config.task_directory, "tasks");
        assert_eq!(config.exclude, Config::default().exclude);
        assert!(config.interpreters.contains_key("ps1"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("task_dir: tasks\n");
        assert!(result.is_err());
    }
}

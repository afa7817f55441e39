//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{BoltError, ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["bolt.yml", "bolt.yaml"];

/// A loaded configuration together with the directory it applies to
#[derive(Debug, Clone)]
pub struct Project {
    /// Canonical project root
    pub root: PathBuf,

    /// Configuration file, when one was found
    pub config_path: Option<PathBuf>,

    /// Parsed configuration (defaults when no file exists)
    pub config: Config,
}

impl Project {
    /// Absolute task directory for this project
    pub fn task_directory(&self) -> PathBuf {
        self.root.join(&self.config.task_directory)
    }

    /// Absolute dotenv path for this project
    pub fn env_file(&self) -> PathBuf {
        self.root.join(&self.config.env_file)
    }
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, BoltError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, BoltError> {
    // An empty file is a valid "all defaults" configuration
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Load the project for an explicit config file
pub fn load_project_file(path: &Path) -> Result<Project, BoltError> {
    let config = parse_config_file(path)?;
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(Project {
        root: root.canonicalize()?,
        config_path: Some(path.to_path_buf()),
        config,
    })
}

/// Load the project starting from a directory, falling back to defaults
/// rooted at that directory when no config file exists above it
pub fn load_project_from(start_dir: &Path) -> Result<Project, BoltError> {
    match find_config_file_from(start_dir.to_path_buf()) {
        Ok(path) => load_project_file(&path),
        Err(ConfigError::NotFound(searched)) => {
            tracing::debug!(searched = %searched, "no config file found, using defaults");
            Ok(Project {
                root: start_dir.canonicalize()?,
                config_path: None,
                config: Config::default(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the project with automatic discovery from the current directory
pub fn load_project_auto() -> Result<Project, BoltError> {
    load_project_from(&env::current_dir()?)
}

/// Read the project's dotenv file; a missing file yields no variables
pub fn load_env_file(path: &Path) -> ConfigResult<BTreeMap<String, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::EnvFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut vars = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| ConfigError::EnvFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

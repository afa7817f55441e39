//! Configuration validation
//!
//! This module provides validation logic for configuration files and task names.

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, MetadataError, MetadataResult};
use globset::Glob;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

/// Longest accepted task name
pub const MAX_TASK_NAME_LEN: usize = 50;

fn task_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("task name pattern is valid"))
}

/// Check a task name: lowercase letter first, then lowercase letters, digits
/// or hyphens, at most 50 characters
pub fn validate_task_name(name: &str) -> MetadataResult<()> {
    if name.len() > MAX_TASK_NAME_LEN {
        return Err(MetadataError::InvalidName {
            name: name.to_string(),
            reason: format!("longer than {} characters", MAX_TASK_NAME_LEN),
        });
    }
    if !task_name_regex().is_match(name) {
        return Err(MetadataError::InvalidName {
            name: name.to_string(),
            reason: "must match ^[a-z][a-z0-9-]*$".to_string(),
        });
    }
    Ok(())
}

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    validate_task_directory(&config.task_directory)?;

    if config.interpreters.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one interpreter must be configured".to_string(),
        ));
    }

    for (extension, argv) in &config.interpreters {
        validate_extension(extension)?;
        if argv.is_empty() || argv[0].trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "interpreter for '.{}' must name a program",
                extension
            )));
        }
    }

    for pattern in &config.exclude {
        Glob::new(pattern).map_err(|e| {
            ConfigError::Invalid(format!("invalid exclude pattern '{}': {}", pattern, e))
        })?;
    }

    Ok(())
}

/// The task directory must stay relative to the project root
fn validate_task_directory(dir: &str) -> ConfigResult<()> {
    if dir.trim().is_empty() {
        return Err(ConfigError::Invalid("task_directory is empty".to_string()));
    }
    let path = Path::new(dir);
    if path.is_absolute() || path.components().any(|c| matches!(c, Component::Prefix(_))) {
        return Err(ConfigError::Invalid(format!(
            "task_directory '{}' must be relative to the project root",
            dir
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ConfigError::Invalid(format!(
            "task_directory '{}' must not contain '..'",
            dir
        )));
    }
    Ok(())
}

fn validate_extension(extension: &str) -> ConfigResult<()> {
    let plain = !extension.is_empty()
        && extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !plain {
        return Err(ConfigError::Invalid(format!(
            "interpreter key '{}' must be a bare file extension",
            extension
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_task_names() {
        for name in ["build", "check-index", "a", "deploy2", "x-1-y"] {
            assert!(validate_task_name(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_task_names() {
        for name in ["Build", "1build", "-build", "build_it", "build!", "", "bu ild"] {
            assert!(validate_task_name(name).is_err(), "{:?} should be invalid", name);
        }
    }

    #[test]
    fn test_task_name_length_limit() {
        let fifty = "a".repeat(50);
        let fifty_one = "a".repeat(51);
        assert!(validate_task_name(&fifty).is_ok());
        assert!(matches!(
            validate_task_name(&fifty_one),
            Err(MetadataError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_absolute_task_directory() {
        let config = Config {
            task_directory: "/etc".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_parent_task_directory() {
        for dir in ["../escaped", "tasks/../../x", ".."] {
            let config = Config {
                task_directory: dir.to_string(),
                ..Config::default()
            };
            assert!(
                matches!(validate_config(&config), Err(ConfigError::Invalid(_))),
                "{} should be rejected",
                dir
            );
        }
    }

    #[test]
    fn test_validate_empty_interpreter() {
        let mut config = Config::default();
        config.interpreters.insert("py".to_string(), vec![]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_dotted_extension() {
        let mut config = Config::default();
        config
            .interpreters
            .insert(".py".to_string(), vec!["python3".to_string()]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_exclude_pattern() {
        let config = Config {
            exclude: vec!["[unclosed".to_string()],
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}

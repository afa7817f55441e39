//! Task registry construction
//!
//! Core tasks are merged with project tasks discovered in the task directory.
//! The resulting name lookup is built once per invocation and never mutated
//! afterwards.

use crate::config::Config;
use crate::error::{BoltError, ConfigError, MetadataError};
use crate::registry::metadata::{parse_metadata, read_header};
use crate::registry::{core_tasks, Task};
use crate::runner::security::validate_path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Non-fatal problem found while building the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWarning {
    /// A task file header could not be accepted; the file was skipped
    InvalidMetadata { path: PathBuf, error: MetadataError },

    /// A task file could not be read; the file was skipped
    Unreadable { path: PathBuf, error: String },

    /// A project task replaced a core task
    CoreOverride {
        name: String,
        core_names: Vec<String>,
        script: Option<PathBuf>,
    },

    /// Two project tasks claimed the same name; the later one was skipped
    DuplicateName { name: String, kept: String, skipped: String },
}

impl fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryWarning::InvalidMetadata { path, error } => {
                write!(f, "skipping {}: {}", path.display(), error)
            }
            RegistryWarning::Unreadable { path, error } => {
                write!(f, "skipping {}: {}", path.display(), error)
            }
            RegistryWarning::CoreOverride { name, core_names, script } => {
                write!(
                    f,
                    "project task '{}' overrides core task '{}'",
                    name,
                    core_names.join(", ")
                )?;
                if let Some(script) = script {
                    write!(f, " ({})", script.display())?;
                }
                Ok(())
            }
            RegistryWarning::DuplicateName { name, kept, skipped } => write!(
                f,
                "task name '{}' is declared by both '{}' and '{}'; keeping '{}'",
                name, kept, skipped, kept
            ),
        }
    }
}

/// Name → task lookup; every alias maps to the same shared task
#[derive(Debug, Default)]
pub struct Registry {
    tasks: BTreeMap<String, Rc<Task>>,
    warnings: Vec<RegistryWarning>,
}

impl Registry {
    /// Registry holding only the core tasks
    pub fn core() -> Self {
        Self::merge(core_tasks(), Vec::new())
    }

    /// Merge project tasks over core tasks.
    ///
    /// A project task sharing any name with a core task replaces that core
    /// task under all of its names. Among project tasks the first one to
    /// claim a name keeps it and any later task claiming it is skipped.
    pub fn merge(core: Vec<Task>, project: Vec<Task>) -> Self {
        let mut warnings = Vec::new();

        let mut core_map: BTreeMap<String, Rc<Task>> = BTreeMap::new();
        for task in core {
            insert_all(&mut core_map, Rc::new(task));
        }

        let mut project_map: BTreeMap<String, Rc<Task>> = BTreeMap::new();
        for task in project {
            let clash = task
                .names
                .iter()
                .find_map(|n| project_map.get(n).map(|existing| (n.clone(), existing.clone())));
            if let Some((name, existing)) = clash {
                let warning = RegistryWarning::DuplicateName {
                    name,
                    kept: describe_source(&existing),
                    skipped: describe_source(&task),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }
            insert_all(&mut project_map, Rc::new(task));
        }

        for (name, task) in &project_map {
            let Some(core_task) = core_map.get(name).cloned() else {
                continue;
            };
            for core_name in &core_task.names {
                core_map.remove(core_name);
            }
            let warning = RegistryWarning::CoreOverride {
                name: name.clone(),
                core_names: core_task.names.clone(),
                script: task.script_path().map(Path::to_path_buf),
            };
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }

        core_map.extend(project_map);
        Registry {
            tasks: core_map,
            warnings,
        }
    }

    /// Look up a task by any of its names
    pub fn get(&self, name: &str) -> Option<&Rc<Task>> {
        self.tasks.get(name)
    }

    /// Whether a name resolves to a task
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// All registered names, aliases included, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Each task once, sorted by primary name
    pub fn primary_tasks(&self) -> Vec<&Rc<Task>> {
        let mut seen = BTreeMap::new();
        for task in self.tasks.values() {
            seen.entry(task.primary_name()).or_insert(task);
        }
        seen.into_values().collect()
    }

    /// Problems encountered while building this registry
    pub fn warnings(&self) -> &[RegistryWarning] {
        &self.warnings
    }

    /// Number of registered names, aliases included
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn insert_all(map: &mut BTreeMap<String, Rc<Task>>, task: Rc<Task>) {
    for name in &task.names {
        map.insert(name.clone(), Rc::clone(&task));
    }
}

fn describe_source(task: &Task) -> String {
    match task.script_path() {
        Some(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        None => task.primary_name().to_string(),
    }
}

/// Build the registry for a task directory.
///
/// A missing task directory is not an error: only core tasks are returned.
/// An existing task directory must lie inside the project root.
pub fn build_registry(
    task_directory: &Path,
    project_root: &Path,
    config: &Config,
) -> Result<Registry, BoltError> {
    if !task_directory.exists() {
        tracing::debug!(dir = %task_directory.display(), "task directory not found, using core tasks only");
        return Ok(Registry::core());
    }

    let task_directory = validate_path(task_directory, project_root)?;
    let (project, mut warnings) = discover_project_tasks(&task_directory, config)?;

    let mut registry = Registry::merge(core_tasks(), project);
    warnings.append(&mut registry.warnings);
    registry.warnings = warnings;
    Ok(registry)
}

/// Scan a directory (non-recursively) for task scripts
pub fn discover_project_tasks(
    task_directory: &Path,
    config: &Config,
) -> Result<(Vec<Task>, Vec<RegistryWarning>), BoltError> {
    let exclude = build_exclude_set(&config.exclude)?;
    let mut warnings = Vec::new();

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(task_directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            tracing::debug!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        let is_script = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.interpreter_for(ext).is_some());
        if !is_script || exclude.is_match(&file_name) {
            continue;
        }
        files.push((file_name, path));
    }
    files.sort();

    let mut tasks = Vec::new();
    for (file_name, path) in files {
        let header = match read_header(&path) {
            Ok(header) => header,
            Err(e) => {
                let warning = RegistryWarning::Unreadable {
                    path,
                    error: e.to_string(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }
        };

        let parsed = parse_metadata(&header, &file_name).and_then(|meta| {
            Task::project(meta.names, meta.description, meta.dependencies, path.clone())
        });
        match parsed {
            Ok(task) => {
                tracing::debug!(task = %task.primary_name(), file = %file_name, "discovered project task");
                tasks.push(task);
            }
            Err(error) => {
                let warning = RegistryWarning::InvalidMetadata { path, error };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok((tasks, warnings))
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, BoltError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            ConfigError::Invalid(format!("invalid exclude pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ConfigError::Invalid(format!("invalid exclude patterns: {}", e)).into())
}

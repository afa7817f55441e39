//! New task file generation

use crate::config::validate_task_name;
use crate::error::{BoltError, ConfigError};
use crate::runner::security::validate_path;
use std::fs;
use std::path::{Path, PathBuf};

/// Create `<task_directory>/<name>.sh` with a header block.
///
/// The task directory is created when missing and must resolve below
/// `project_root`. Existing files are never overwritten.
pub fn create_task_file(
    task_directory: &Path,
    project_root: &Path,
    name: &str,
) -> Result<PathBuf, BoltError> {
    validate_task_name(name).map_err(|e| ConfigError::InvalidTaskName {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    // Check the closest existing ancestor so nothing is created outside the root
    let existing = task_directory
        .ancestors()
        .find(|p| p.exists())
        .unwrap_or(project_root);
    validate_path(existing, project_root)?;

    fs::create_dir_all(task_directory)?;
    let task_directory = validate_path(task_directory, project_root)?;

    let path = task_directory.join(format!("{}.sh", name));
    if path.exists() {
        return Err(ConfigError::TaskFileExists(path).into());
    }

    fs::write(&path, task_template(name))?;
    Ok(path)
}

fn task_template(name: &str) -> String {
    format!(
        "#!/usr/bin/env sh\n\
         # TASK: {name}\n\
         # DESCRIPTION: {name} task\n\
         # DEPENDS:\n\
         \n\
         set -eu\n\
         \n\
         echo \"Running {name}\"\n",
        name = name
    )
}

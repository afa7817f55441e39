//! Path validation for task execution
//!
//! Every path handed to a child process must resolve inside the project root
//! and must not contain characters a launcher or shell could interpret.

use crate::error::{SecurityError, SecurityResult};
use std::path::{Path, PathBuf};

/// Characters rejected anywhere in a task path
pub const FORBIDDEN_CHARACTERS: &[char] = &[
    '"', '\'', '`', '$', ';', '&', '|', '<', '>', '*', '?', '\0', '\n', '\r',
];

/// Reject paths containing launcher-significant characters
pub fn check_characters(path: &Path) -> SecurityResult<()> {
    let text = path.to_string_lossy();
    match text.chars().find(|c| FORBIDDEN_CHARACTERS.contains(c)) {
        Some(ch) => Err(SecurityError::ForbiddenCharacter {
            path: text.into_owned(),
            ch,
        }),
        None => Ok(()),
    }
}

/// Validate `path` against `project_root` and return its canonical form.
///
/// Relative paths are resolved against the project root. The path must exist.
pub fn validate_path(path: &Path, project_root: &Path) -> SecurityResult<PathBuf> {
    check_characters(path)?;

    let root = project_root
        .canonicalize()
        .map_err(|e| SecurityError::Unresolvable {
            path: project_root.to_path_buf(),
            error: e.to_string(),
        })?;

    let candidate = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let canonical = candidate
        .canonicalize()
        .map_err(|e| SecurityError::Unresolvable {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    if !canonical.starts_with(&root) {
        return Err(SecurityError::OutsideProjectRoot {
            path: canonical,
            root,
        });
    }

    Ok(canonical)
}

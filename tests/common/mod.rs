//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project with a `.build` task directory
pub struct TestProject {
    pub dir: TempDir,
    pub root: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir(root.join(".build")).unwrap();
        TestProject { dir, root }
    }

    pub fn task_dir(&self) -> PathBuf {
        self.root.join(".build")
    }

    /// Write a task script that appends `body_name` to log.txt in the project root
    pub fn add_logging_task(&self, file_name: &str, header: &str, body_name: &str) -> PathBuf {
        self.add_script(
            file_name,
            &format!(
                "{}\necho {} >> \"$BOLT_PROJECT_ROOT/log.txt\"\n",
                header, body_name
            ),
        )
    }

    /// Write a raw script into the task directory
    pub fn add_script(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.task_dir().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Lines written to log.txt so far
    pub fn log(&self) -> Vec<String> {
        read_lines(&self.root.join("log.txt"))
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// The format/build example: build (alias compile) depends on format
pub fn format_build_project() -> TestProject {
    let project = TestProject::new();
    project.add_logging_task("Invoke-Format.sh", "# TASK: format", "format");
    project.add_logging_task(
        "Invoke-Build.sh",
        "# TASK: build, compile\n# DESCRIPTION: Builds the project\n# DEPENDS: format",
        "build",
    );
    project
}

//! Task representation
//!
//! A task is either a core task backed by a handler compiled into bolt, or a
//! project task backed by a script file in the task directory.

use crate::error::{ExecutionResult, MetadataError, MetadataResult};
use crate::runner::{run_script, Context};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Handler signature for core tasks
pub type BuiltinHandler = Rc<dyn Fn(&Context, &[String]) -> ExecutionResult<()>>;

/// Where a task comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskKind {
    Core,
    Project,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Core => write!(f, "core"),
            TaskKind::Project => write!(f, "project"),
        }
    }
}

/// How a task body is run
#[derive(Clone)]
pub enum Invoke {
    /// Handler compiled into bolt
    Builtin(BuiltinHandler),

    /// External script file
    Script(PathBuf),
}

impl fmt::Debug for Invoke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invoke::Builtin(_) => f.write_str("Builtin(..)"),
            Invoke::Script(path) => f.debug_tuple("Script").field(path).finish(),
        }
    }
}

/// A named unit of work
#[derive(Debug, Clone)]
pub struct Task {
    /// Names, primary name first
    pub names: Vec<String>,

    /// Free-text description
    pub description: Option<String>,

    /// Names of tasks to run first, in order
    pub dependencies: Vec<String>,

    /// Core or project
    pub kind: TaskKind,

    /// Body
    pub invoke: Invoke,
}

impl Task {
    /// Build a core task named `name`, also reachable as `aliases`
    pub fn core<F>(name: &str, aliases: &[&str], description: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> ExecutionResult<()> + 'static,
    {
        Task {
            names: std::iter::once(name)
                .chain(aliases.iter().copied())
                .map(str::to_string)
                .collect(),
            description: Some(description.to_string()),
            dependencies: Vec::new(),
            kind: TaskKind::Core,
            invoke: Invoke::Builtin(Rc::new(handler)),
        }
    }

    /// Build a project task backed by a script. `names` must not be empty.
    pub fn project(
        names: Vec<String>,
        description: Option<String>,
        dependencies: Vec<String>,
        script: PathBuf,
    ) -> MetadataResult<Self> {
        if names.is_empty() {
            return Err(MetadataError::EmptyTaskList);
        }
        Ok(Task {
            names,
            description,
            dependencies,
            kind: TaskKind::Project,
            invoke: Invoke::Script(script),
        })
    }

    /// Canonical identity used for execution bookkeeping
    pub fn primary_name(&self) -> &str {
        &self.names[0]
    }

    /// All names after the primary one
    pub fn aliases(&self) -> &[String] {
        &self.names[1..]
    }

    /// Script path of a project task
    pub fn script_path(&self) -> Option<&Path> {
        match &self.invoke {
            Invoke::Script(path) => Some(path),
            Invoke::Builtin(_) => None,
        }
    }

    /// Run the task body (dependencies are not considered here)
    pub fn invoke(&self, ctx: &mut Context, args: &[String]) -> ExecutionResult<()> {
        match &self.invoke {
            Invoke::Builtin(handler) => handler(ctx, args),
            Invoke::Script(path) => run_script(self, path, ctx, args),
        }
    }
}

//! Execution context for task running
//!
//! The context carries the settings every task body needs: project root,
//! working directory, exported variables, interpreters and verbosity.

use crate::config::{Config, Project};
use colored::Colorize;
use std::collections::BTreeMap;
use std::env;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// Execution context shared by all tasks of a run
#[derive(Debug, Clone)]
pub struct Context {
    /// Canonical project root; scripts must live below it
    pub project_root: PathBuf,

    /// Working directory for the task body currently running
    pub working_dir: PathBuf,

    /// Variables exported to project task scripts
    pub vars: BTreeMap<String, String>,

    /// Interpreter argv prefix per script extension
    pub interpreters: BTreeMap<String, Vec<String>>,

    /// Fail on dependency cycles instead of treating them as satisfied
    pub strict_cycles: bool,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context rooted at the current directory
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Context {
            project_root: cwd.clone(),
            working_dir: cwd,
            vars: BTreeMap::new(),
            interpreters: Config::default().interpreters,
            strict_cycles: false,
            verbosity: Verbosity::Normal,
        }
    }

    /// Create a context for a loaded project
    pub fn for_project(project: &Project) -> Self {
        Context {
            project_root: project.root.clone(),
            working_dir: project.root.clone(),
            vars: BTreeMap::new(),
            interpreters: project.config.interpreters.clone(),
            strict_cycles: project.config.strict_cycles,
            verbosity: Verbosity::Normal,
        }
    }

    /// Set the project root (also used as the initial working directory)
    pub fn with_project_root(mut self, root: PathBuf) -> Self {
        self.working_dir = root.clone();
        self.project_root = root;
        self
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Set the interpreters
    pub fn with_interpreters(mut self, interpreters: BTreeMap<String, Vec<String>>) -> Self {
        self.interpreters = interpreters;
        self
    }

    /// Interpreter argv prefix for a script extension
    pub fn interpreter_for(&self, extension: &str) -> Option<&[String]> {
        self.interpreters.get(extension).map(Vec::as_slice)
    }

    /// Enable or disable strict cycle detection
    pub fn with_strict_cycles(mut self, strict: bool) -> Self {
        self.strict_cycles = strict;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Switch the working directory until the returned guard is dropped
    pub fn enter_dir(&mut self, dir: &Path) -> DirScope<'_> {
        let previous = std::mem::replace(&mut self.working_dir, dir.to_path_buf());
        DirScope {
            ctx: self,
            previous,
        }
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[INFO]".blue(), message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[ERROR]".red().bold(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }

    /// Print task start message
    pub fn print_task_start(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[TASK]".cyan().bold(), task_name.bold());
        }
    }

    /// Print task complete message
    pub fn print_task_complete(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[DONE]".green().bold(), task_name);
        }
    }

    /// Print task failure message
    pub fn print_task_failed(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[FAIL]".red().bold(), task_name);
        }
    }

    /// Print task skip message
    pub fn print_task_skip(&self, task_name: &str, reason: &str) {
        self.print_debug(&format!("Skipping task '{}': {}", task_name, reason));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped working directory; restores the previous one when dropped
pub struct DirScope<'a> {
    ctx: &'a mut Context,
    previous: PathBuf,
}

impl Deref for DirScope<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for DirScope<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        self.ctx.working_dir = std::mem::take(&mut self.previous);
    }
}

//! Core tasks shipped with bolt

use crate::error::{ExecutionError, ExecutionResult};
use crate::registry::Task;
use crate::runner::Context;
use std::process::{Command as StdCommand, Stdio};

/// The fixed set of core tasks
pub fn core_tasks() -> Vec<Task> {
    vec![Task::core(
        "check-index",
        &["check"],
        "Fails when the git working tree has uncommitted changes",
        check_index,
    )]
}

/// Succeed only when `git status --porcelain` reports a clean tree
fn check_index(ctx: &Context, _args: &[String]) -> ExecutionResult<()> {
    let output = StdCommand::new("git")
        .args(["status", "--porcelain"])
        .current_dir(&ctx.project_root)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ExecutionError::Builtin {
            task: "check-index".to_string(),
            message: format!("could not run git: {}", e),
        })?;

    if !output.status.success() {
        return Err(ExecutionError::Builtin {
            task: "check-index".to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let changes = String::from_utf8_lossy(&output.stdout);
    let dirty: Vec<&str> = changes.lines().filter(|l| !l.trim().is_empty()).collect();
    if !dirty.is_empty() {
        for line in &dirty {
            ctx.print_error(line);
        }
        return Err(ExecutionError::Builtin {
            task: "check-index".to_string(),
            message: format!("{} uncommitted change(s) in working tree", dirty.len()),
        });
    }

    ctx.print_info("Git index is clean");
    Ok(())
}

//! Requested task handling
//!
//! Turns raw command line values into task names, checks them against the
//! registry and runs them in order.

use crate::error::{ExecutionError, ExecutionResult};
use crate::registry::Registry;
use crate::runner::{execute, Context, ExecutionState};
use std::fmt::Write;

/// Split space- or comma-separated task names
pub fn parse_task_names<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names in `requested` that the registry does not know
pub fn unknown_tasks<'a>(requested: &'a [String], registry: &Registry) -> Vec<&'a str> {
    requested
        .iter()
        .filter(|name| !registry.contains(name))
        .map(String::as_str)
        .collect()
}

/// Run every requested task in order with one shared execution state.
///
/// Nothing runs unless every name is known. Stops at the first failure.
pub fn dispatch(
    requested: &[String],
    args: &[String],
    registry: &Registry,
    ctx: &mut Context,
    skip_dependencies: bool,
) -> ExecutionResult<ExecutionState> {
    let unknown = unknown_tasks(requested, registry);
    if !unknown.is_empty() {
        return Err(ExecutionError::UnknownTask(unknown.join(", ")));
    }

    let mut state = ExecutionState::new();
    for name in requested {
        execute(name, args, registry, ctx, &mut state, skip_dependencies)?;
    }
    Ok(state)
}

/// Human-readable listing of every task, one entry per primary name
pub fn format_task_list(registry: &Registry) -> String {
    let mut out = String::new();
    let tasks = registry.primary_tasks();
    if tasks.is_empty() {
        out.push_str("No tasks available.\n");
        return out;
    }

    let width = tasks
        .iter()
        .map(|t| t.primary_name().len())
        .max()
        .unwrap_or(0);

    out.push_str("Available tasks:\n");
    for task in tasks {
        let _ = writeln!(
            out,
            "  {:<width$}  [{}]  {}",
            task.primary_name(),
            task.kind,
            task.description.as_deref().unwrap_or(""),
            width = width
        );
        if !task.aliases().is_empty() {
            let _ = writeln!(out, "  {:<width$}  aliases: {}", "", task.aliases().join(", "), width = width);
        }
        if !task.dependencies.is_empty() {
            let _ = writeln!(
                out,
                "  {:<width$}  depends: {}",
                "",
                task.dependencies.join(", "),
                width = width
            );
        }
    }
    out
}

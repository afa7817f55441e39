//! Dependency resolution and execution
//!
//! Tasks are executed depth first: declared dependencies run (in order)
//! before the task body, and each task runs at most once per run.

use crate::error::{ExecutionError, ExecutionResult};
use crate::registry::Registry;
use crate::runner::Context;
use std::collections::HashSet;

/// Run-scoped bookkeeping, shared by every task requested in one invocation
#[derive(Debug, Default)]
pub struct ExecutionState {
    /// Primary names already visited in this run
    executed: HashSet<String>,

    /// Primary names whose dependencies are being resolved, outermost first
    in_progress: Vec<String>,

    /// Primary names whose body actually ran, in order
    ran: Vec<String>,

    /// (task, dependency) pairs where the dependency was not registered
    missing: Vec<(String, String)>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a primary name was already visited
    pub fn is_executed(&self, primary: &str) -> bool {
        self.executed.contains(primary)
    }

    /// Whether a primary name is still resolving its dependencies
    pub fn is_in_progress(&self, primary: &str) -> bool {
        self.in_progress.iter().any(|t| t == primary)
    }

    /// Task bodies that ran, in execution order
    pub fn ran(&self) -> &[String] {
        &self.ran
    }

    /// Dependencies that were skipped because no task carries their name
    pub fn missing_dependencies(&self) -> &[(String, String)] {
        &self.missing
    }

    /// Render the cycle that leads back to `primary`
    fn cycle_path(&self, primary: &str) -> String {
        let start = self
            .in_progress
            .iter()
            .position(|t| t == primary)
            .unwrap_or(0);
        let mut path: Vec<&str> = self.in_progress[start..].iter().map(String::as_str).collect();
        path.push(primary);
        path.join(" -> ")
    }
}

/// Execute `task_name` after its dependencies.
///
/// Returns `Ok(())` when the task (and everything it needed) succeeded.
/// A task already visited in this run is treated as satisfied. When that
/// visit is still in progress the dependency graph contains a cycle: it is
/// logged and treated as satisfied, or reported as
/// [`ExecutionError::CycleDetected`] when the context asks for strict cycles.
pub fn execute(
    task_name: &str,
    args: &[String],
    registry: &Registry,
    ctx: &mut Context,
    state: &mut ExecutionState,
    skip_dependencies: bool,
) -> ExecutionResult<()> {
    let task = registry
        .get(task_name)
        .cloned()
        .ok_or_else(|| ExecutionError::UnknownTask(task_name.to_string()))?;
    let primary = task.primary_name().to_string();

    if state.is_executed(&primary) {
        if state.is_in_progress(&primary) {
            let cycle = state.cycle_path(&primary);
            if ctx.strict_cycles {
                return Err(ExecutionError::CycleDetected(cycle));
            }
            tracing::warn!(cycle = %cycle, "dependency cycle detected; treating '{}' as satisfied", primary);
        } else {
            ctx.print_task_skip(&primary, "already executed in this run");
        }
        return Ok(());
    }

    // Marked before dependencies so a cycle back to this task stops here
    state.executed.insert(primary.clone());
    state.in_progress.push(primary.clone());

    let result = resolve_dependencies(&primary, &task.dependencies, registry, ctx, state, skip_dependencies);
    state.in_progress.pop();
    result?;

    ctx.print_task_start(&primary);
    match task.invoke(ctx, args) {
        Ok(()) => {
            state.ran.push(primary.clone());
            ctx.print_task_complete(&primary);
            Ok(())
        }
        Err(e) => {
            ctx.print_task_failed(&primary);
            Err(e)
        }
    }
}

fn resolve_dependencies(
    primary: &str,
    dependencies: &[String],
    registry: &Registry,
    ctx: &mut Context,
    state: &mut ExecutionState,
    skip_dependencies: bool,
) -> ExecutionResult<()> {
    if skip_dependencies {
        if !dependencies.is_empty() {
            ctx.print_debug(&format!(
                "Skipping dependencies of '{}': {}",
                primary,
                dependencies.join(", ")
            ));
        }
        return Ok(());
    }

    for dependency in dependencies {
        if !registry.contains(dependency) {
            tracing::warn!("dependency '{}' of task '{}' not found, skipping", dependency, primary);
            state.missing.push((primary.to_string(), dependency.clone()));
            continue;
        }

        execute(dependency, &[], registry, ctx, state, false).map_err(|e| {
            ExecutionError::DependencyFailed {
                task: primary.to_string(),
                dependency: dependency.clone(),
                source: Box::new(e),
            }
        })?;
    }

    Ok(())
}

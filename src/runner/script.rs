//! External script execution
//!
//! This module runs project task scripts as child processes.

use crate::error::{ExecutionError, ExecutionResult};
use crate::registry::Task;
use crate::runner::security::validate_path;
use crate::runner::Context;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

/// Run a project task script with `args`, waiting for it to exit.
///
/// The script path is validated before anything is spawned. The child runs
/// in the script's directory; the context's working directory is restored
/// afterwards whatever the outcome.
pub fn run_script(
    task: &Task,
    script: &Path,
    ctx: &mut Context,
    args: &[String],
) -> ExecutionResult<()> {
    let script = validate_path(script, &ctx.project_root)?;

    let interpreter = script
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| ctx.interpreter_for(ext))
        .map(<[String]>::to_vec)
        .ok_or_else(|| ExecutionError::NoInterpreter(script.clone()))?;

    let task_dir = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.project_root.clone());

    let scope = ctx.enter_dir(&task_dir);

    let mut command = StdCommand::new(&interpreter[0]);
    command.args(&interpreter[1..]);
    command.arg(&script);
    command.args(args);

    command.current_dir(&scope.working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    for (key, value) in &scope.vars {
        command.env(key, value);
    }
    command.env("BOLT_PROJECT_ROOT", &scope.project_root);
    command.env("BOLT_TASK_NAME", task.primary_name());
    command.env("BOLT_TASK_DIRECTORY", &task_dir);

    scope.print_debug(&format!(
        "{} {} {}",
        interpreter.join(" "),
        script.display(),
        args.join(" ")
    ));

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        task: task.primary_name().to_string(),
        error: format!("{}: {}", interpreter[0], e),
    })?;

    if !status.success() {
        return Err(ExecutionError::ProcessFailed {
            task: task.primary_name().to_string(),
            code: status.code(),
        });
    }

    Ok(())
}

//! Main CLI application

use crate::cli::{create_task_file, dispatch, format_task_list, init_logging, parse_task_names, unknown_tasks};
use crate::config::{load_env_file, load_project_auto, load_project_file, validate_config, Project};
use crate::error::{BoltError, ExecutionError};
use crate::registry::build_registry;
use crate::runner::{render_outline, Context, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("bolt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run project build tasks in dependency order")
        .arg(
            Arg::new("tasks")
                .value_name("TASK")
                .help("Tasks to run, space- or comma-separated")
                .num_args(0..),
        )
        .arg(
            Arg::new("task_args")
                .value_name("ARGS")
                .help("Arguments passed to each requested task")
                .num_args(0..)
                .last(true),
        )
        .arg(
            Arg::new("only")
                .long("only")
                .help("Run the requested tasks without their dependencies")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list_tasks")
                .short('l')
                .long("list-tasks")
                .help("List available tasks without running anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("outline")
                .long("outline")
                .help("Show the dependency tree and execution order without running anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("new_task")
                .long("new-task")
                .value_name("NAME")
                .help("Create a new task script in the task directory"),
        )
        .arg(
            Arg::new("task_directory")
                .long("task-directory")
                .value_name("DIR")
                .help("Directory containing project tasks (relative to the project root)"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to bolt.yml config file"),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script")
                .value_parser(clap::value_parser!(Shell)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print task output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn get_values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn load_project(matches: &ArgMatches) -> Result<Project, BoltError> {
    let mut project = match matches.get_one::<String>("file") {
        Some(path) => load_project_file(&PathBuf::from(path))?,
        None => load_project_auto()?,
    };
    if let Some(dir) = matches.get_one::<String>("task_directory") {
        project.config.task_directory = dir.clone();
    }
    validate_config(&project.config)?;
    Ok(project)
}

/// Run the CLI with explicit arguments
pub fn run_from<I, T>(args: I) -> Result<(), BoltError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = build_command();
    let matches = match command.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                e.print()?;
                return Ok(());
            }
            _ => return Err(BoltError::Usage(e.render().to_string())),
        },
    };

    let verbosity = get_verbosity(&matches);
    init_logging(verbosity);

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut command, "bolt", &mut io::stdout());
        return Ok(());
    }

    let project = load_project(&matches)?;
    let task_directory = project.task_directory();
    tracing::debug!(
        root = %project.root.display(),
        tasks = %task_directory.display(),
        "project loaded"
    );

    if let Some(name) = matches.get_one::<String>("new_task") {
        let path = create_task_file(&task_directory, &project.root, name)?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let registry = build_registry(&task_directory, &project.root, &project.config)?;

    if matches.get_flag("list_tasks") {
        print!("{}", format_task_list(&registry));
        return Ok(());
    }

    let requested = parse_task_names(&get_values(&matches, "tasks"));
    if requested.is_empty() {
        command.print_help()?;
        println!();
        return Ok(());
    }

    let unknown = unknown_tasks(&requested, &registry);
    if !unknown.is_empty() {
        return Err(ExecutionError::UnknownTask(unknown.join(", ")).into());
    }

    let skip_dependencies = matches.get_flag("only");

    if matches.get_flag("outline") {
        print!("{}", render_outline(
            &requested,
            &registry,
            skip_dependencies,
            project.config.strict_cycles,
        )?);
        return Ok(());
    }

    let vars = load_env_file(&project.env_file())?;
    let mut ctx = Context::for_project(&project)
        .with_vars(vars)
        .with_verbosity(verbosity);

    let task_args = get_values(&matches, "task_args");
    let state = dispatch(&requested, &task_args, &registry, &mut ctx, skip_dependencies)?;
    ctx.print_debug(&format!("Completed: {}", state.ran().join(", ")));

    Ok(())
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), BoltError> {
    run_from(std::env::args_os())
}

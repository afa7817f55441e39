//! Integration tests for task discovery

mod common;

use bolt::config::Config;
use bolt::registry::{build_registry, RegistryWarning, TaskKind};
use common::{format_build_project, TestProject};
use std::rc::Rc;

#[test]
fn test_header_names_and_aliases() {
    let project = format_build_project();
    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    let build = registry.get("build").unwrap();
    assert_eq!(build.names, vec!["build", "compile"]);
    assert_eq!(build.dependencies, vec!["format"]);
    assert_eq!(build.description.as_deref(), Some("Builds the project"));
    assert_eq!(build.kind, TaskKind::Project);
    assert!(Rc::ptr_eq(build, registry.get("compile").unwrap()));

    assert!(registry.contains("format"));
    assert!(registry.contains("check-index"));
    assert!(registry.warnings().is_empty());
}

#[test]
fn test_name_derived_from_file_name() {
    let project = TestProject::new();
    project.add_script("Invoke-DeployDocs.sh", "# DESCRIPTION: Publish docs\necho docs\n");

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    let task = registry.get("deploy-docs").unwrap();
    assert_eq!(task.names, vec!["deploy-docs"]);
    assert_eq!(task.description.as_deref(), Some("Publish docs"));
}

#[test]
fn test_invalid_names_dropped_with_warning() {
    let project = TestProject::new();
    project.add_script("upper.sh", "# TASK: Build\n");
    project.add_script("long.sh", &format!("# TASK: {}\n", "a".repeat(51)));
    project.add_script("symbol.sh", "# TASK: build!\n");
    project.add_script("good.sh", "# TASK: good\n");

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    assert!(registry.contains("good"));
    assert_eq!(registry.primary_tasks().len(), 2); // good + check-index
    let invalid = registry
        .warnings()
        .iter()
        .filter(|w| matches!(w, RegistryWarning::InvalidMetadata { .. }))
        .count();
    assert_eq!(invalid, 3);
}

#[test]
fn test_project_task_overrides_core_task() {
    let project = TestProject::new();
    project.add_script("check.sh", "# TASK: check-index\n# DESCRIPTION: custom check\n");

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    let task = registry.get("check-index").unwrap();
    assert_eq!(task.kind, TaskKind::Project);
    // The core alias goes away with the core task
    assert!(!registry.contains("check"));
    assert!(registry
        .warnings()
        .iter()
        .any(|w| matches!(w, RegistryWarning::CoreOverride { name, .. } if name == "check-index")));
}

#[test]
fn test_test_files_and_other_extensions_ignored() {
    let project = TestProject::new();
    project.add_script("build.sh", "# TASK: build\n");
    project.add_script("build.Tests.sh", "# TASK: build-tests\n");
    project.add_script("lint_test.sh", "# TASK: lint-tests\n");
    project.add_script("README.md", "# TASK: readme\n");
    std::fs::create_dir(project.task_dir().join("nested")).unwrap();
    project.add_script("nested/deep.sh", "# TASK: deep\n");

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    assert!(registry.contains("build"));
    for name in ["build-tests", "lint-tests", "readme", "deep"] {
        assert!(!registry.contains(name), "{} should not be registered", name);
    }
}

#[test]
fn test_missing_task_directory_yields_core_tasks() {
    let project = TestProject::new();
    let registry = build_registry(&project.root.join("nope"), &project.root, &Config::default()).unwrap();

    assert!(registry.contains("check-index"));
    assert_eq!(registry.primary_tasks().len(), 1);
}

#[test]
fn test_task_directory_outside_root_rejected() {
    let project = TestProject::new();
    let elsewhere = TestProject::new();

    let result = build_registry(&elsewhere.task_dir(), &project.root, &Config::default());

    assert!(matches!(result, Err(bolt::BoltError::Security(_))));
}

#[test]
fn test_custom_interpreter_extension() {
    let project = TestProject::new();
    project.add_script("Invoke-Report.py", "# TASK: report\nprint('hi')\n");
    let mut config = Config::default();
    config
        .interpreters
        .insert("py".to_string(), vec!["python3".to_string()]);

    let registry = build_registry(&project.task_dir(), &project.root, &config).unwrap();

    assert!(registry.contains("report"));
}

#[test]
fn test_byte_order_mark_keeps_header_aliases() {
    let project = TestProject::new();
    project.add_script("Invoke-Build.ps1", "\u{feff}# TASK: build, compile\n# DEPENDS: format\n");

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    let build = registry.get("compile").unwrap();
    assert_eq!(build.names, vec!["build", "compile"]);
    assert_eq!(build.dependencies, vec!["format"]);
    assert!(registry.warnings().is_empty());
}

#[test]
fn test_non_utf8_header_still_registers() {
    let project = TestProject::new();
    std::fs::write(
        project.task_dir().join("build.sh"),
        b"# TASK: build\n# DESCRIPTION: caf\xE9\necho built\n",
    )
    .unwrap();

    let registry = build_registry(&project.task_dir(), &project.root, &Config::default()).unwrap();

    assert!(registry.contains("build"));
    assert!(registry.warnings().is_empty());
}

//! Dependency outline
//!
//! Renders the dependency tree of the requested tasks together with the order
//! in which they would run, without running anything.

use crate::error::{ExecutionError, ExecutionResult};
use crate::registry::Registry;
use std::collections::HashSet;
use std::fmt::Write;

/// Render the outline for `requested`, following the executor's visiting rules.
///
/// With `strict_cycles` the first cycle is reported as the failure a real run
/// would stop at, in place of the execution order.
pub fn render_outline(
    requested: &[String],
    registry: &Registry,
    skip_dependencies: bool,
    strict_cycles: bool,
) -> ExecutionResult<String> {
    for name in requested {
        if !registry.contains(name) {
            return Err(ExecutionError::UnknownTask(name.clone()));
        }
    }

    let mut outline = Outline {
        registry,
        skip_dependencies,
        strict_cycles,
        failing_cycle: None,
        listed: HashSet::new(),
        path: Vec::new(),
        order: Vec::new(),
        out: String::new(),
    };

    for name in requested {
        outline.visit(name, 0);
    }

    let _ = writeln!(outline.out);
    match &outline.failing_cycle {
        Some(cycle) => {
            let _ = writeln!(
                outline.out,
                "Execution order: fails with strict_cycles, circular dependency {}",
                cycle
            );
        }
        None => {
            let _ = writeln!(outline.out, "Execution order: {}", outline.order.join(" -> "));
        }
    }
    Ok(outline.out)
}

struct Outline<'a> {
    registry: &'a Registry,
    skip_dependencies: bool,
    strict_cycles: bool,
    failing_cycle: Option<String>,
    listed: HashSet<String>,
    path: Vec<String>,
    order: Vec<String>,
    out: String,
}

impl Outline<'_> {
    fn visit(&mut self, name: &str, depth: usize) {
        let indent = "  ".repeat(depth);

        let Some(task) = self.registry.get(name).cloned() else {
            let _ = writeln!(self.out, "{}{} (missing)", indent, name);
            return;
        };
        let primary = task.primary_name().to_string();

        let mut label = primary.clone();
        if name != primary {
            let _ = write!(label, " [{}]", name);
        }

        if let Some(start) = self.path.iter().position(|p| *p == primary) {
            let _ = writeln!(self.out, "{}{} (cycle)", indent, label);
            if self.strict_cycles && self.failing_cycle.is_none() {
                let mut cycle = self.path[start..].to_vec();
                cycle.push(primary);
                self.failing_cycle = Some(cycle.join(" -> "));
            }
            return;
        }
        if self.listed.contains(&primary) {
            let _ = writeln!(self.out, "{}{} (already listed)", indent, label);
            return;
        }

        match &task.description {
            Some(desc) => {
                let _ = writeln!(self.out, "{}{} - {}", indent, label, desc);
            }
            None => {
                let _ = writeln!(self.out, "{}{}", indent, label);
            }
        }
        self.listed.insert(primary.clone());

        if !self.skip_dependencies {
            self.path.push(primary.clone());
            for dependency in &task.dependencies {
                self.visit(dependency, depth + 1);
            }
            self.path.pop();
        }

        self.order.push(primary);
    }
}

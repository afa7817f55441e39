//! Task header parsing
//!
//! Project tasks describe themselves with plain comment lines near the top of
//! the script:
//!
//! ```text
//! # TASK: build, compile
//! # DESCRIPTION: Compiles the project
//! # DEPENDS: format, lint
//! ```
//!
//! Only the first [`HEADER_LINES`] lines are inspected. Without a `TASK`
//! header the name is derived from the file name.

use crate::config::validate_task_name;
use crate::error::{MetadataError, MetadataResult};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// Number of leading lines searched for header comments
pub const HEADER_LINES: usize = 30;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Leading file name segments dropped when deriving a task name
const VERB_PREFIXES: &[&str] = &["invoke", "run", "start", "execute", "do"];

/// Parsed header of a task file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMetadata {
    pub names: Vec<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*#\s*(TASK|DESCRIPTION|DEPENDS)\s*:(.*)$").expect("header pattern is valid")
    })
}

/// Read at most [`HEADER_LINES`] lines from a task file.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn read_header(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    let mut line = Vec::new();
    for _ in 0..HEADER_LINES {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        header.push_str(text.trim_end_matches(&['\n', '\r'][..]));
        header.push('\n');
    }
    Ok(header)
}

/// Parse task metadata from file content
pub fn parse_metadata(content: &str, file_name: &str) -> MetadataResult<TaskMetadata> {
    let mut names = None;
    let mut description = None;
    let mut dependencies = None;

    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    for line in content.lines().take(HEADER_LINES) {
        let Some(caps) = header_regex().captures(line) else {
            continue;
        };
        let value = caps[2].trim();
        match &caps[1] {
            "TASK" if names.is_none() => names = Some(split_list(value)),
            "DESCRIPTION" if description.is_none() => {
                description = Some(value.to_string()).filter(|d| !d.is_empty());
            }
            "DEPENDS" if dependencies.is_none() => dependencies = Some(split_list(value)),
            _ => {}
        }
    }

    let names = match names {
        Some(list) if list.is_empty() => return Err(MetadataError::EmptyTaskList),
        Some(list) => list,
        None => vec![derive_task_name(file_name)?],
    };

    for name in &names {
        validate_task_name(name)?;
    }

    Ok(TaskMetadata {
        names,
        description,
        dependencies: dependencies.unwrap_or_default(),
    })
}

/// Derive a task name from a file name: `Invoke-DeployDocs.sh` becomes `deploy-docs`
pub fn derive_task_name(file_name: &str) -> MetadataResult<String> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut segments: Vec<&str> = stem.split('-').collect();
    if segments.len() > 1 && VERB_PREFIXES.contains(&segments[0].to_lowercase().as_str()) {
        segments.remove(0);
    }

    let words: Vec<String> = segments
        .iter()
        .flat_map(|segment| split_words(segment))
        .map(|word| word.to_lowercase())
        .collect();

    if words.is_empty() {
        return Err(MetadataError::UnnamedFile(file_name.to_string()));
    }

    let name = words.join("-");
    validate_task_name(&name)?;
    Ok(name)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a CamelCase / snake_case segment into words
fn split_words(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_header() {
        let content = "#!/usr/bin/env sh\n# TASK: build, compile\n# DESCRIPTION: Compiles the project\n# DEPENDS: format, lint\necho hi\n";
        let meta = parse_metadata(content, "Invoke-Build.sh").unwrap();
        assert_eq!(meta.names, vec!["build", "compile"]);
        assert_eq!(meta.description.as_deref(), Some("Compiles the project"));
        assert_eq!(meta.dependencies, vec!["format", "lint"]);
    }

    #[test]
    fn test_parse_without_task_header_uses_file_name() {
        let meta = parse_metadata("# DESCRIPTION: Formats code\n", "Invoke-Format.ps1").unwrap();
        assert_eq!(meta.names, vec!["format"]);
        assert!(meta.dependencies.is_empty());
    }

    #[test]
    fn test_header_whitespace_tolerated() {
        let meta = parse_metadata("#TASK:lint ,  check-style \n  #  DEPENDS :  \n", "x.sh").unwrap();
        assert_eq!(meta.names, vec!["lint", "check-style"]);
        assert!(meta.dependencies.is_empty());
    }

    #[test]
    fn test_first_header_wins() {
        let meta = parse_metadata("# TASK: first\n# TASK: second\n", "x.sh").unwrap();
        assert_eq!(meta.names, vec!["first"]);
    }

    #[test]
    fn test_header_after_limit_ignored() {
        let mut content = "echo filler\n".repeat(HEADER_LINES);
        content.push_str("# TASK: late\n");
        let meta = parse_metadata(&content, "Invoke-Early.sh").unwrap();
        assert_eq!(meta.names, vec!["early"]);
    }

    #[test]
    fn test_empty_task_header_rejected() {
        assert_eq!(
            parse_metadata("# TASK: ,\n", "x.sh"),
            Err(MetadataError::EmptyTaskList)
        );
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let result = parse_metadata("# TASK: Build\n", "build.sh");
        assert!(matches!(result, Err(MetadataError::InvalidName { .. })));

        let long = format!("# TASK: {}\n", "a".repeat(51));
        assert!(parse_metadata(&long, "x.sh").is_err());

        assert!(parse_metadata("# TASK: build$\n", "x.sh").is_err());
    }

    #[test]
    fn test_byte_order_mark_ignored() {
        let meta = parse_metadata("\u{feff}# TASK: build, compile\n# DEPENDS: format\n", "Invoke-Build.ps1").unwrap();
        assert_eq!(meta.names, vec!["build", "compile"]);
        assert_eq!(meta.dependencies, vec!["format"]);
    }

    #[test]
    fn test_read_header_replaces_invalid_utf8() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("build.sh");
        std::fs::write(&path, b"# TASK: build\r\n# DESCRIPTION: caf\xE9\n").unwrap();

        let header = read_header(&path).unwrap();
        let meta = parse_metadata(&header, "build.sh").unwrap();

        assert_eq!(meta.names, vec!["build"]);
        assert_eq!(meta.description.as_deref(), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_derive_task_name() {
        assert_eq!(derive_task_name("Invoke-Format.ps1").unwrap(), "format");
        assert_eq!(derive_task_name("Invoke-DeployDocs.sh").unwrap(), "deploy-docs");
        assert_eq!(derive_task_name("Invoke-HTMLReport.sh").unwrap(), "html-report");
        assert_eq!(derive_task_name("build.sh").unwrap(), "build");
        assert_eq!(derive_task_name("run_tests.sh").unwrap(), "run-tests");
        assert_eq!(derive_task_name("Run-Tests.sh").unwrap(), "tests");
        assert_eq!(derive_task_name("Publish-Package.sh").unwrap(), "publish-package");
    }

    #[test]
    fn test_derive_task_name_invalid() {
        assert!(derive_task_name("2fast.sh").is_err());
        assert!(matches!(
            derive_task_name("___.sh"),
            Err(MetadataError::UnnamedFile(_))
        ));
    }
}

//! Classification of dropped text into a [`TextKind`].
//!
//! Checks run in a fixed order and the first match wins: Python source, then file paths,
//! then Maya DAG paths. Path-like kinds only look at the first non-empty line, so a drop is
//! assumed to hold one kind of content throughout.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use rustpython_parser::{Mode, parse};
use tracing::debug;

use crate::domain::model::TextKind;

static WINDOWS_DRIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("valid drive regex"));
static UNC_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\\\\|//)[^\\/\s]+[\\/]?").expect("valid UNC regex"));
static DAG_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?[A-Za-z0-9_][A-Za-z0-9_:]*(?:\|[A-Za-z0-9_][A-Za-z0-9_:]*)*$")
        .expect("valid DAG regex")
});

/// Characters that end a line, including the form feed and Unicode separators.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Substrings that hint a single parseable line is code rather than a bare expression.
const CODE_HINTS: [&str; 10] = [
    "\n", ";", ":", "def ", "class ", "import ", "from ", "with ", "for ", "if ",
];

/// Classify raw dropped text. Never fails; unrecognised input is [`TextKind::Unknown`].
pub fn classify(text: &str) -> TextKind {
    let kind = classify_inner(text);
    debug!(kind = %kind, bytes = text.len(), "classified dropped text");
    kind
}

fn classify_inner(text: &str) -> TextKind {
    if looks_like_python_script(text) {
        return TextKind::PythonScript;
    }

    let Some(first) = split_nonempty_lines(text).into_iter().next() else {
        return TextKind::Unknown;
    };

    if looks_like_file_path(first) {
        TextKind::FilePaths
    } else if looks_like_maya_dag_path(first) {
        TextKind::MayaDagPath
    } else {
        TextKind::Unknown
    }
}

/// Split text into stripped, non-empty lines.
pub fn split_nonempty_lines(text: &str) -> Vec<&str> {
    text.split(LINE_BREAKS)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether the text parses as Python and carries some hint of being a script.
///
/// A lone identifier or a relative path such as `a/b` is valid Python too, so a clean parse
/// alone is not enough.
pub fn looks_like_python_script(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if parse(trimmed, Mode::Module, "<drop>").is_err() {
        return false;
    }

    let code_hint = CODE_HINTS.iter().any(|hint| trimmed.contains(hint));
    code_hint || trimmed.contains('\n') || trimmed.split_whitespace().count() > 3
}

/// Heuristic for a single filesystem path (drive, UNC, POSIX, or nested relative path).
pub fn looks_like_file_path(line: &str) -> bool {
    if !line.contains(['/', '\\']) {
        return false;
    }

    WINDOWS_DRIVE.is_match(line)
        || UNC_PREFIX.is_match(line)
        || looks_like_posix_path(line)
        || normalizes_to_nested_path(line)
}

fn looks_like_posix_path(line: &str) -> bool {
    line.starts_with('/') || line.starts_with("./") || line.starts_with("../")
}

// Rejects bare file names: the last component must differ from the whole line.
fn normalizes_to_nested_path(line: &str) -> bool {
    let normalized: PathBuf = Path::new(line).components().collect();
    let name = normalized
        .components()
        .next_back()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default();

    name != line && normalized.as_os_str().len() > 1
}

/// Heuristic for a single Maya DAG path such as `|group1|pSphere1` or `ns:grp|ns:mesh`.
pub fn looks_like_maya_dag_path(line: &str) -> bool {
    if looks_like_file_path(line) || line.contains(char::is_whitespace) {
        return false;
    }
    DAG_PATH.is_match(line)
}

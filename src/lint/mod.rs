//! Blank-line spacing analysis for class members.
//!
//! The rule measures blank lines above each constructor and method of a
//! class declaration, counting from the member's leading documentation
//! comment when it has one, and proposes a replacement that inserts or
//! removes exactly the lines needed.

pub mod diagnostic;
pub mod errors;
pub mod fixer;
pub mod line_index;
pub mod rule;
pub mod spacing;

pub use diagnostic::{Diagnostic, Fix, Severity};
pub use errors::LintError;
pub use fixer::{apply_fixes, fix_source, write_fixed, FixOutcome, FixPass, MAX_FIX_PASSES};
pub use line_index::{LineIndex, Position};
pub use rule::{LinesBetweenClassMembers, RULE_NAME};
pub use spacing::{measure, SpacingConfig, SpacingOutcome};

use crate::ts::Dialect;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file read from disk together with its diagnostics.
#[derive(Debug, Clone)]
pub struct LintedFile {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read and lint one file. Empty files have nothing to check.
pub fn lint_file(rule: &LinesBetweenClassMembers, path: &Path) -> Result<LintedFile, LintError> {
    let dialect =
        Dialect::from_path(path).ok_or_else(|| LintError::UnsupportedFile(path.to_path_buf()))?;
    let source = fs::read_to_string(path).map_err(|source| LintError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let diagnostics = if source.is_empty() {
        Vec::new()
    } else {
        rule.lint_source(&source, dialect)?
    };
    debug!(path = %path.display(), count = diagnostics.len(), "linted file");

    Ok(LintedFile {
        path: path.to_path_buf(),
        dialect,
        source,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_file_reads_and_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "class A {\n  a() {}\n  b() {}\n}\n").unwrap();

        let linted = lint_file(&LinesBetweenClassMembers::default(), &path).unwrap();
        assert_eq!(linted.dialect, Dialect::TypeScript);
        assert_eq!(linted.diagnostics.len(), 1);
    }

    #[test]
    fn lint_file_accepts_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ts");
        fs::write(&path, "").unwrap();

        let linted = lint_file(&LinesBetweenClassMembers::default(), &path).unwrap();
        assert!(linted.diagnostics.is_empty());
    }

    #[test]
    fn lint_file_rejects_unknown_extensions() {
        let err = lint_file(&LinesBetweenClassMembers::default(), Path::new("notes.md"))
            .unwrap_err();
        assert!(matches!(err, LintError::UnsupportedFile(_)));
    }

    #[test]
    fn lint_file_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = lint_file(
            &LinesBetweenClassMembers::default(),
            &dir.path().join("missing.ts"),
        )
        .unwrap_err();
        assert!(matches!(err, LintError::Io { .. }));
    }
}

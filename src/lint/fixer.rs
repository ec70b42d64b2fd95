//! Applying rule fixes to source text.
//!
//! Fixes from one lint run can overlap: a member's replacement spans its
//! whole text, which contains the members of any class nested inside it.
//! Each pass applies the non-overlapping subset, then the file is linted
//! again, until nothing fixable remains.

use crate::edit::{Edit, EditResult};
use crate::lint::diagnostic::{Diagnostic, Fix};
use crate::lint::errors::LintError;
use crate::lint::rule::LinesBetweenClassMembers;
use crate::ts::validator::validate_rewrite;
use crate::ts::Dialect;
use std::path::Path;
use tracing::{debug, warn};

/// Upper bound on lint/fix rounds for a single file.
pub const MAX_FIX_PASSES: usize = 10;

/// Outcome of applying one batch of fixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPass {
    pub text: String,
    pub applied: usize,
    /// Fixes left out because they overlap an applied one.
    pub skipped: usize,
}

/// Outcome of fixing a whole file.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub text: String,
    pub passes: usize,
    pub applied: usize,
    /// Diagnostics still reported for `text`.
    pub remaining: Vec<Diagnostic>,
}

impl FixOutcome {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Apply every non-overlapping fix among `diagnostics` to `source`.
///
/// Fixes are chosen front to back; a fix overlapping an earlier choice is
/// skipped. The chosen ones are applied bottom-to-top so offsets stay valid.
pub fn apply_fixes(
    file: &Path,
    source: &str,
    diagnostics: &[Diagnostic],
) -> Result<FixPass, LintError> {
    let mut fixes: Vec<&Fix> = diagnostics.iter().filter_map(|d| d.fix.as_ref()).collect();
    fixes.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));

    let mut chosen: Vec<&Fix> = Vec::with_capacity(fixes.len());
    for fix in fixes {
        if chosen.last().is_some_and(|last| last.overlaps(fix)) {
            continue;
        }
        chosen.push(fix);
    }
    let skipped = diagnostics.iter().filter(|d| d.fix.is_some()).count() - chosen.len();

    let mut text = source.to_string();
    for fix in chosen.iter().rev() {
        let expected = source.get(fix.offset..fix.end()).unwrap_or_default();
        let edit = Edit::new(file, fix.offset, fix.end(), fix.replacement.as_str(), expected);
        text = edit.apply_to_str(&text)?;
    }

    Ok(FixPass {
        text,
        applied: chosen.len(),
        skipped,
    })
}

/// Lint and fix `source` until it is clean or no progress can be made.
pub fn fix_source(
    rule: &LinesBetweenClassMembers,
    file: &Path,
    source: &str,
    dialect: Dialect,
) -> Result<FixOutcome, LintError> {
    let mut text = source.to_string();
    let mut applied = 0;
    let mut passes = 0;
    let mut diagnostics = rule.lint_source(&text, dialect)?;

    while passes < MAX_FIX_PASSES && diagnostics.iter().any(Diagnostic::is_fixable) {
        let pass = apply_fixes(file, &text, &diagnostics)?;
        if let Err(err) = validate_rewrite(&text, &pass.text, dialect) {
            warn!(file = %file.display(), %err, "fix would introduce a syntax error, stopping");
            break;
        }

        passes += 1;
        applied += pass.applied;
        debug!(
            file = %file.display(),
            pass = passes,
            applied = pass.applied,
            skipped = pass.skipped,
            "applied fix pass"
        );

        if pass.text == text {
            break;
        }
        text = pass.text;
        diagnostics = rule.lint_source(&text, dialect)?;
    }

    Ok(FixOutcome {
        text,
        passes,
        applied,
        remaining: diagnostics,
    })
}

/// Replace the contents of `file` with `fixed`, provided it still holds
/// `original`.
pub fn write_fixed(file: &Path, original: &str, fixed: &str) -> Result<EditResult, LintError> {
    let edit = Edit::new(file, 0, original.len(), fixed, original);
    Ok(edit.apply()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::spacing::SpacingConfig;
    use std::fs;

    fn fix(source: &str, option: Option<&str>) -> FixOutcome {
        let rule = LinesBetweenClassMembers::from_option(option);
        fix_source(&rule, Path::new("a.ts"), source, Dialect::TypeScript).unwrap()
    }

    #[test]
    fn fixes_every_member_in_one_pass() {
        let outcome = fix("class A {\n  a() {}\n  b() {}\n  c() {}\n}\n", None);
        assert_eq!(outcome.text, "class A {\n  a() {}\n\n  b() {}\n\n  c() {}\n}\n");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.passes, 1);
        assert!(outcome.remaining.is_empty());
    }

    #[test]
    fn nested_class_members_need_a_second_pass() {
        let source = "class A {\n  a() {}\n  b() {\n    return class B {\n      c() {}\n      d() {}\n    };\n  }\n}\n";
        let outcome = fix(source, None);
        assert!(outcome.remaining.is_empty());
        assert_eq!(
            outcome.text,
            "class A {\n  a() {}\n\n  b() {\n    return class B {\n      c() {}\n      d() {}\n    };\n  }\n}\n"
        );

        let source = "class A {\n  a() {}\n  b() {\n    class B {\n      c() {}\n      d() {}\n    }\n  }\n}\n";
        let outcome = fix(source, None);
        assert!(outcome.remaining.is_empty());
        assert_eq!(outcome.passes, 2);
        assert_eq!(
            outcome.text,
            "class A {\n  a() {}\n\n  b() {\n    class B {\n      c() {}\n\n      d() {}\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn clean_source_is_untouched() {
        let source = "class A {\n  a() {}\n\n  b() {}\n}\n";
        let outcome = fix(source, None);
        assert!(!outcome.changed(source));
        assert_eq!(outcome.passes, 0);
    }

    #[test]
    fn invalid_option_produces_no_fixes() {
        let source = "class A {\n  a() {}\n  b() {}\n}\n";
        let outcome = fix(source, Some("abc"));
        assert!(!outcome.changed(source));
        assert_eq!(outcome.remaining.len(), 1);
    }

    #[test]
    fn overlapping_fixes_are_skipped() {
        let source = "0123456789";
        let diagnostic = |offset: usize, length: usize, replacement: &str| Diagnostic {
            rule_name: "test",
            severity: Default::default(),
            offset,
            length,
            message: String::new(),
            fix: Some(Fix {
                offset,
                length,
                replacement: replacement.to_string(),
            }),
            start: crate::lint::LineIndex::new(source).position(source, offset),
            end: crate::lint::LineIndex::new(source).position(source, offset + length),
        };
        let diagnostics = vec![
            diagnostic(6, 2, "x"),
            diagnostic(0, 5, "ab"),
            diagnostic(2, 2, "y"),
        ];

        let pass = apply_fixes(Path::new("a.ts"), source, &diagnostics).unwrap();
        assert_eq!(pass.text, "ab5x89");
        assert_eq!(pass.applied, 2);
        assert_eq!(pass.skipped, 1);
    }

    #[test]
    fn write_fixed_replaces_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ts");
        let original = "class A {\n  a() {}\n  b() {}\n}\n";
        fs::write(&path, original).unwrap();

        let rule = LinesBetweenClassMembers::new(SpacingConfig::AtLeastOne);
        let outcome = fix_source(&rule, &path, original, Dialect::TypeScript).unwrap();
        let result = write_fixed(&path, original, &outcome.text).unwrap();

        assert!(matches!(result, EditResult::Applied { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), outcome.text);
    }

    #[test]
    fn write_fixed_refuses_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "class B {}\n").unwrap();

        let result = write_fixed(&path, "class A {}\n", "class A { }\n");
        assert!(matches!(result, Err(LintError::Edit(_))));
    }
}

use crate::pool::with_parser;
use crate::ts::errors::TreeSitterError;
use crate::ts::parser::{Dialect, ErrorNode};

/// Validate that TypeScript source code has no syntax errors.
///
/// Returns Ok(()) if the code parses without ERROR nodes.
pub fn validate_syntax(source: &str, dialect: Dialect) -> Result<(), TreeSitterError> {
    let errors = error_nodes(source, dialect)?;
    match errors.len() {
        0 => Ok(()),
        1 => Err(TreeSitterError::SyntaxError {
            byte_start: errors[0].byte_start,
            byte_end: errors[0].byte_end,
        }),
        n => Err(TreeSitterError::MultipleSyntaxErrors { count: n }),
    }
}

/// Validate that a rewritten source doesn't introduce syntax errors.
///
/// Fixes only move whitespace, so the rewritten source must not have more
/// ERROR nodes than the original. Counts are compared, not spans.
pub fn validate_rewrite(
    original: &str,
    rewritten: &str,
    dialect: Dialect,
) -> Result<(), TreeSitterError> {
    let before = error_nodes(original, dialect)?;
    let after = error_nodes(rewritten, dialect)?;

    if after.len() <= before.len() {
        return Ok(());
    }

    // Report the first error that has no counterpart at the same offset.
    let introduced: Vec<&ErrorNode> = after
        .iter()
        .filter(|e| !before.iter().any(|o| o.byte_start == e.byte_start))
        .collect();

    match introduced.as_slice() {
        [single] => Err(TreeSitterError::SyntaxError {
            byte_start: single.byte_start,
            byte_end: single.byte_end,
        }),
        _ => Err(TreeSitterError::MultipleSyntaxErrors {
            count: after.len() - before.len(),
        }),
    }
}

fn error_nodes(source: &str, dialect: Dialect) -> Result<Vec<ErrorNode>, TreeSitterError> {
    with_parser(dialect, |parser| {
        parser
            .parse_with_source(source)
            .map(|parsed| parsed.error_nodes())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_class_passes() {
        let source = "class A {\n  a() {}\n\n  b() {}\n}\n";
        assert!(validate_syntax(source, Dialect::TypeScript).is_ok());
    }

    #[test]
    fn broken_class_fails() {
        let source = "class A {\n  a( {}\n";
        assert!(validate_syntax(source, Dialect::TypeScript).is_err());
    }

    #[test]
    fn whitespace_rewrite_is_accepted() {
        let original = "class A {\n  a() {}\n  b() {}\n}\n";
        let rewritten = "class A {\n  a() {}\n\n  b() {}\n}\n";
        assert!(validate_rewrite(original, rewritten, Dialect::TypeScript).is_ok());
    }

    #[test]
    fn rewrite_introducing_errors_is_rejected() {
        let original = "class A {\n  a() {}\n}\n";
        let rewritten = "class A {\n  a() {\n}\n";
        assert!(validate_rewrite(original, rewritten, Dialect::TypeScript).is_err());
    }

    #[test]
    fn preexisting_errors_do_not_block_rewrite() {
        let original = "class A {\n  a() {}\n  b( {}\n}\n";
        let rewritten = "class A {\n  a() {}\n\n  b( {}\n}\n";
        assert!(validate_rewrite(original, rewritten, Dialect::TypeScript).is_ok());
    }
}

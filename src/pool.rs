//! Thread-local parser pooling.
//!
//! Creating a tree-sitter parser and loading a grammar is not free, and a
//! lint run parses every file at least twice (lint, then re-lint after each
//! fix pass). Each thread keeps one parser per dialect and reuses it.

use crate::ts::{Dialect, TreeSitterError, TypeScriptParser};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static PARSERS: RefCell<HashMap<Dialect, TypeScriptParser>> = RefCell::new(HashMap::new());
}

/// Execute function with the pooled parser for `dialect`.
///
/// On first call per thread and dialect, creates a new parser. Subsequent
/// calls reuse the same instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use member_spacing::pool::with_parser;
/// use member_spacing::ts::Dialect;
///
/// let has_errors = with_parser(Dialect::TypeScript, |parser| {
///     parser.parse_with_source("class A {}").map(|parsed| parsed.has_errors())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(dialect: Dialect, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut TypeScriptParser) -> R,
{
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        let parser = match parsers.entry(dialect) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(TypeScriptParser::with_dialect(dialect)?)
            }
        };
        Ok(f(parser))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_parser_is_reused_per_dialect() {
        let first = with_parser(Dialect::TypeScript, |parser| parser.dialect()).unwrap();
        let second = with_parser(Dialect::Tsx, |parser| parser.dialect()).unwrap();
        assert_eq!(first, Dialect::TypeScript);
        assert_eq!(second, Dialect::Tsx);

        let count = PARSERS.with(|cell| cell.borrow().len());
        with_parser(Dialect::TypeScript, |_| ()).unwrap();
        assert_eq!(PARSERS.with(|cell| cell.borrow().len()), count);
    }
}

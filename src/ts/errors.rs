use crate::ts::parser::Dialect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("could not load the {dialect} grammar")]
    LanguageSet { dialect: Dialect },

    #[error("tree-sitter produced no tree for {dialect} source")]
    ParseFailed { dialect: Dialect },

    #[error("source has a syntax error at bytes {byte_start}..{byte_end}")]
    SyntaxError { byte_start: usize, byte_end: usize },

    #[error("source has {count} syntax errors")]
    MultipleSyntaxErrors { count: usize },
}

//! Tree-sitter integration for TypeScript sources.
//!
//! This module provides CST parsing through the grammars bundled with
//! ast-grep-language, and the member traversal the spacing rule runs on.
//! Comments and whitespace stay addressable by byte offset.

pub mod errors;
pub mod members;
pub mod parser;
pub mod validator;

pub use errors::TreeSitterError;
pub use members::{collect_members, MemberContainer, MemberDecl, MemberKind, MemberVisitor};
pub use parser::{Dialect, ParsedSource, TypeScriptParser};
pub use validator::{validate_rewrite, validate_syntax};

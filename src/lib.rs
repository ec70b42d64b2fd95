//! Member Spacing: blank-line checks between TypeScript class members
//!
//! Implements the `lines-between-class-members` lint rule: every constructor
//! and method of a class declaration must be separated from whatever comes
//! before it by at least one blank line, or by exactly `N` blank lines when
//! configured that way.
//!
//! # Architecture
//!
//! Sources are parsed with tree-sitter ([`ts`]), members are found by an
//! explicit walker with per-kind callbacks, and the rule ([`lint`]) turns
//! each non-conforming member into a [`Diagnostic`] whose optional [`Fix`]
//! is a byte-span replacement. Fixes reach the disk only through [`Edit`],
//! which verifies the text it replaces and writes atomically.
//!
//! # Example
//!
//! ```no_run
//! use member_spacing::ts::Dialect;
//! use member_spacing::LinesBetweenClassMembers;
//!
//! let rule = LinesBetweenClassMembers::from_option(Some("1"));
//! let source = "class A {\n  a() {}\n  b() {}\n}\n";
//!
//! match rule.lint_source(source, Dialect::TypeScript) {
//!     Ok(diagnostics) => {
//!         for diagnostic in diagnostics {
//!             println!("{}: {}", diagnostic.start.line + 1, diagnostic.message);
//!         }
//!     }
//!     Err(e) => eprintln!("lint failed: {}", e),
//! }
//! ```

pub mod config;
pub mod edit;
pub mod lint;
pub mod pool;
pub mod report;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, ConfigFormat, LintConfig};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use lint::{
    fix_source, lint_file, Diagnostic, Fix, FixOutcome, LinesBetweenClassMembers, LintError,
    LintedFile, Severity, SpacingConfig, RULE_NAME,
};
pub use ts::{Dialect, ParsedSource, TreeSitterError, TypeScriptParser};

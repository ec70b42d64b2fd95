//! Diagnostics reported to the host.

use crate::lint::line_index::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Replacement of `length` bytes at `offset` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub offset: usize,
    pub length: usize,
    pub replacement: String,
}

impl Fix {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn overlaps(&self, other: &Fix) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// One spacing violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule_name: &'static str,
    pub severity: Severity,
    pub offset: usize,
    pub length: usize,
    pub message: String,
    pub fix: Option<Fix>,
    pub start: Position,
    pub end: Position,
}

impl Diagnostic {
    /// Text of the flagged span.
    pub fn snippet<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset..self.offset + self.length)
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

//! Rendering diagnostics for the terminal and for tools.

use crate::lint::{Diagnostic, LintedFile, Position, Severity};
use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

/// How `check` prints its findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Totals across every linted file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixable: usize,
}

impl Summary {
    pub fn add(&mut self, diagnostics: &[Diagnostic]) {
        self.files += 1;
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
            }
            if diagnostic.is_fixable() {
                self.fixable += 1;
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files = if self.files == 1 { "file" } else { "files" };
        if self.errors == 0 && self.warnings == 0 {
            return write!(f, "{} {files} checked, no problems", self.files);
        }
        write!(
            f,
            "{} {files} checked: {} error(s), {} warning(s), {} fixable with `fix`",
            self.files, self.errors, self.warnings, self.fixable
        )
    }
}

/// One line per diagnostic: `path:line:col: severity: message [rule]`,
/// with 1-based line and column.
pub fn render_text(path: &Path, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let location = format!(
            "{}:{}:{}:",
            path.display(),
            diagnostic.start.line + 1,
            diagnostic.start.character + 1
        );
        let severity = match diagnostic.severity {
            Severity::Error => diagnostic.severity.to_string().red().bold(),
            Severity::Warning => diagnostic.severity.to_string().yellow().bold(),
        };
        let _ = writeln!(
            out,
            "{} {}: {} {}",
            location.bold(),
            severity,
            diagnostic.message,
            format!("[{}]", diagnostic.rule_name).dimmed()
        );
    }
    out
}

/// A diagnostic in tslint's JSON formatter shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFailure<'a> {
    name: String,
    failure: &'a str,
    rule_name: &'a str,
    rule_severity: &'static str,
    start_position: Position,
    end_position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonReplacement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReplacement<'a> {
    inner_start: usize,
    inner_length: usize,
    inner_text: &'a str,
}

impl<'a> JsonFailure<'a> {
    fn new(path: &Path, diagnostic: &'a Diagnostic) -> Self {
        Self {
            name: path.display().to_string(),
            failure: &diagnostic.message,
            rule_name: diagnostic.rule_name,
            rule_severity: match diagnostic.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARNING",
            },
            start_position: diagnostic.start,
            end_position: diagnostic.end,
            fix: diagnostic.fix.as_ref().map(|fix| JsonReplacement {
                inner_start: fix.offset,
                inner_length: fix.length,
                inner_text: &fix.replacement,
            }),
        }
    }
}

/// Every diagnostic of every file as one JSON array.
pub fn render_json(files: &[LintedFile]) -> serde_json::Result<String> {
    let failures: Vec<JsonFailure<'_>> = files
        .iter()
        .flat_map(|file| {
            file.diagnostics
                .iter()
                .map(|diagnostic| JsonFailure::new(&file.path, diagnostic))
        })
        .collect();
    serde_json::to_string_pretty(&failures)
}

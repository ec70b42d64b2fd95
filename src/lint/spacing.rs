//! Blank-line counting and line classification.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A lone `{`, or a generic parameter list closing right before `{`.
static OPENING_BRACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*\{\s*|[\w\s,<]*>\s*\{\s*)$").expect("opening brace pattern is valid")
});

/// Required spacing above each member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpacingConfig {
    /// No option given: at least one blank line.
    #[default]
    AtLeastOne,
    /// Exactly this many blank lines.
    Exactly(usize),
    /// The option was not a string of decimal digits.
    Invalid(String),
}

impl SpacingConfig {
    /// Interpret the rule's positional option.
    pub fn from_option(option: Option<&str>) -> Self {
        match option {
            None => SpacingConfig::AtLeastOne,
            Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => value
                .parse()
                .map_or_else(|_| SpacingConfig::Invalid(value.to_string()), SpacingConfig::Exactly),
            Some(value) => SpacingConfig::Invalid(value.to_string()),
        }
    }

    /// Failure message reported for a member under this configuration.
    pub fn message(&self) -> String {
        match self {
            SpacingConfig::AtLeastOne => {
                "must have at least one new line between class methods".to_string()
            }
            SpacingConfig::Exactly(lines) => {
                format!("must have {lines} new line(s) between class methods")
            }
            SpacingConfig::Invalid(value) => format!(
                "invalid value provided for num lines configuration - {value}, see docs for how to configure"
            ),
        }
    }
}

impl fmt::Display for SpacingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpacingConfig::AtLeastOne => write!(f, "at least 1"),
            SpacingConfig::Exactly(lines) => write!(f, "exactly {lines}"),
            SpacingConfig::Invalid(value) => write!(f, "invalid ({value})"),
        }
    }
}

/// Result of measuring the blank lines above one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingOutcome {
    Satisfied,
    /// Blank lines to insert.
    Shortfall(usize),
    /// Superfluous blank lines to delete.
    Excess(usize),
    InvalidConfig,
}

impl SpacingOutcome {
    pub fn is_satisfied(self) -> bool {
        self == SpacingOutcome::Satisfied
    }
}

/// A line is blank if it is empty or whitespace only.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Whether `line` only opens a block (Allman style).
pub fn is_opening_brace_line(line: &str) -> bool {
    OPENING_BRACE_LINE.is_match(line)
}

/// Count blank lines upward from an anchor.
///
/// `blank_above(d)` reports whether the line `d` lines above the anchor is
/// blank; it must return `false` once `d` walks past the start of the file.
pub fn measure<F>(config: &SpacingConfig, mut blank_above: F) -> SpacingOutcome
where
    F: FnMut(usize) -> bool,
{
    match config {
        SpacingConfig::Invalid(_) => SpacingOutcome::InvalidConfig,
        SpacingConfig::AtLeastOne => {
            if blank_above(1) {
                SpacingOutcome::Satisfied
            } else {
                SpacingOutcome::Shortfall(1)
            }
        }
        SpacingConfig::Exactly(required) => {
            let required = *required;
            if let Some(present) = (1..=required).position(|distance| !blank_above(distance)) {
                return SpacingOutcome::Shortfall(required - present);
            }

            let excess = (required + 1..)
                .take_while(|&distance| blank_above(distance))
                .count();
            if excess == 0 {
                SpacingOutcome::Satisfied
            } else {
                SpacingOutcome::Excess(excess)
            }
        }
    }
}

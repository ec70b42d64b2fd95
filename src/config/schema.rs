use crate::lint::{LinesBetweenClassMembers, Severity, SpacingConfig, RULE_NAME};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Rule configuration as written in `member-spacing.toml` or `tslint.json`.
///
/// Other top-level keys (`extends`, `rulesDirectory`, ...) are ignored.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

/// One entry of the `rules` table, in any of the accepted shapes.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `rule = true`
    Enabled(bool),
    /// `rule = [true, 2]`: an enabled flag followed by rule options.
    Options(Vec<OptionValue>),
    /// `[rules.rule]` with `severity` and `options` keys.
    Object {
        #[serde(default)]
        severity: Option<String>,
        #[serde(default)]
        options: Vec<OptionValue>,
    },
    /// Any other shape. Accepted for rules this tool does not run.
    Unrecognized(IgnoredAny),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "string",
        }
    }

    /// Numbers become their decimal spelling; strings are kept verbatim.
    fn as_option_text(&self) -> Option<String> {
        match self {
            OptionValue::Int(value) => Some(value.to_string()),
            OptionValue::Float(value) => Some(value.to_string()),
            OptionValue::String(value) => Some(value.clone()),
            OptionValue::Bool(_) => None,
        }
    }
}

/// A rule entry after shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    pub enabled: bool,
    pub severity: Severity,
    /// The single positional option, as text.
    pub option: Option<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Error,
            option: None,
        }
    }
}

impl RuleSettings {
    /// Build the rule, or `None` when it is switched off.
    pub fn into_rule(self) -> Option<LinesBetweenClassMembers> {
        if !self.enabled {
            return None;
        }
        let config = SpacingConfig::from_option(self.option.as_deref());
        Some(LinesBetweenClassMembers::new(config).with_severity(self.severity))
    }
}

impl RuleSetting {
    /// Check the entry's shape and resolve it.
    ///
    /// Option values are only checked for the spacing rule; other rules
    /// are carried along untouched.
    pub fn resolve(&self, rule: &str) -> Result<RuleSettings, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let mut settings = RuleSettings::default();

        let options: &[OptionValue] = match self {
            RuleSetting::Enabled(enabled) => {
                settings.enabled = *enabled;
                &[]
            }
            RuleSetting::Options(values) => match values.split_first() {
                Some((OptionValue::Bool(enabled), rest)) => {
                    settings.enabled = *enabled;
                    rest
                }
                Some((other, _)) => {
                    issues.push(ValidationIssue::InvalidOption {
                        rule: rule.to_string(),
                        message: format!(
                            "first list element must be a boolean, found {}",
                            other.type_name()
                        ),
                    });
                    &[]
                }
                None => {
                    issues.push(ValidationIssue::InvalidOption {
                        rule: rule.to_string(),
                        message: "options list is empty".to_string(),
                    });
                    &[]
                }
            },
            RuleSetting::Object { severity, options } => {
                match severity.as_deref().map(str::to_ascii_lowercase).as_deref() {
                    None | Some("error") | Some("default") => {}
                    Some("warning") | Some("warn") => settings.severity = Severity::Warning,
                    Some("off") | Some("none") => settings.enabled = false,
                    Some(_) => issues.push(ValidationIssue::InvalidSeverity {
                        rule: rule.to_string(),
                        value: severity.clone().unwrap_or_default(),
                    }),
                }
                options
            }
            RuleSetting::Unrecognized(_) => {
                if rule == RULE_NAME {
                    issues.push(ValidationIssue::InvalidOption {
                        rule: rule.to_string(),
                        message: "expected a boolean, a list or a table".to_string(),
                    });
                }
                &[]
            }
        };

        if rule == RULE_NAME {
            match options {
                [] => {}
                [value] => match value.as_option_text() {
                    Some(text) => settings.option = Some(text),
                    None => issues.push(ValidationIssue::InvalidOption {
                        rule: rule.to_string(),
                        message: format!(
                            "expected a number of lines, found {}",
                            value.type_name()
                        ),
                    }),
                },
                _ => issues.push(ValidationIssue::InvalidOption {
                    rule: rule.to_string(),
                    message: format!("takes at most one option, found {}", options.len()),
                }),
            }
        }

        if issues.is_empty() {
            Ok(settings)
        } else {
            Err(issues)
        }
    }
}

impl LintConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues: Vec<ValidationIssue> = self
            .rules
            .iter()
            .filter_map(|(name, setting)| setting.resolve(name).err())
            .flatten()
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Resolved settings for `rule`, or `None` if the config does not
    /// mention it or the entry is malformed.
    pub fn settings(&self, rule: &str) -> Option<RuleSettings> {
        self.rules.get(rule)?.resolve(rule).ok()
    }

    /// The spacing rule as configured. An unmentioned rule runs with its
    /// defaults; a disabled one yields `None`.
    pub fn lines_between_class_members(&self) -> Option<LinesBetweenClassMembers> {
        self.settings(RULE_NAME).unwrap_or_default().into_rule()
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    InvalidSeverity { rule: String, value: String },
    InvalidOption { rule: String, message: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::InvalidSeverity { rule, value } => {
                write!(f, "rule '{rule}' has unknown severity '{value}'")
            }
            ValidationIssue::InvalidOption { rule, message } => {
                write!(f, "rule '{rule}' has invalid options: {message}")
            }
        }
    }
}

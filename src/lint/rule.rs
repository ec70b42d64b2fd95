//! The `lines-between-class-members` rule.

use crate::lint::diagnostic::{Diagnostic, Fix, Severity};
use crate::lint::errors::LintError;
use crate::lint::line_index::LineIndex;
use crate::lint::spacing::{is_blank, is_opening_brace_line, measure, SpacingConfig, SpacingOutcome};
use crate::pool::with_parser;
use crate::ts::{collect_members, Dialect, MemberContainer, MemberDecl, ParsedSource};
use tracing::{debug, trace};

pub const RULE_NAME: &str = "lines-between-class-members";

/// Checks blank lines above constructors and methods of class declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinesBetweenClassMembers {
    config: SpacingConfig,
    severity: Severity,
}

impl LinesBetweenClassMembers {
    pub fn new(config: SpacingConfig) -> Self {
        Self {
            config,
            severity: Severity::default(),
        }
    }

    /// Build the rule from its raw positional option.
    pub fn from_option(option: Option<&str>) -> Self {
        Self::new(SpacingConfig::from_option(option))
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn config(&self) -> &SpacingConfig {
        &self.config
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Check a parsed file and collect its diagnostics.
    pub fn apply(&self, parsed: &ParsedSource<'_>) -> Vec<Diagnostic> {
        let index = LineIndex::new(parsed.source);
        self.check(parsed, &index).collect()
    }

    /// Parse `source` with the pooled parser and check it.
    pub fn lint_source(&self, source: &str, dialect: Dialect) -> Result<Vec<Diagnostic>, LintError> {
        if source.is_empty() {
            return Err(LintError::EmptySource);
        }

        let diagnostics = with_parser(dialect, |parser| {
            parser
                .parse_with_source(source)
                .map(|parsed| self.apply(&parsed))
        })??;
        Ok(diagnostics)
    }

    /// Check every eligible member of a parsed file.
    ///
    /// Members are collected in one walk up front; each one is measured only
    /// when the iterator reaches it.
    pub fn check<'p>(
        &'p self,
        parsed: &'p ParsedSource<'_>,
        index: &'p LineIndex,
    ) -> impl Iterator<Item = Diagnostic> + 'p {
        let source: &'p str = parsed.source;
        collect_members(parsed.root_node(), source)
            .into_iter()
            .filter(|member| member.container == MemberContainer::Class)
            .filter_map(move |member| self.check_member(&member, source, index))
    }

    fn check_member(
        &self,
        member: &MemberDecl<'_>,
        source: &str,
        index: &LineIndex,
    ) -> Option<Diagnostic> {
        let body = member.body()?;
        let anchor = leading_comment_start(member, source, index).unwrap_or(member.start_byte());
        let anchor_line = index.line_of(anchor);
        let line_start = index.line_start(anchor_line)?;
        let indent = source.get(line_start..anchor)?;

        if !is_blank(indent) {
            trace!(anchor, "member does not start its line, skipping");
            return None;
        }

        let brace_line = index.line_of(body.start_byte());
        if anchor_line <= brace_line {
            trace!(anchor_line, "member shares the class header line");
            return None;
        }

        let prev_line = anchor_line - 1;
        if prev_line == brace_line && member.is_first_member() {
            trace!(anchor_line, "first member below the class header");
            return None;
        }
        if index
            .line_text(source, prev_line)
            .is_some_and(is_opening_brace_line)
        {
            trace!(anchor_line, "member below an opening brace");
            return None;
        }

        let outcome = measure(&self.config, |distance| {
            anchor_line
                .checked_sub(distance)
                .and_then(|line| index.line_text(source, line))
                .is_some_and(is_blank)
        });
        debug!(line = anchor_line + 1, spacing = %self.config, ?outcome, "checked member spacing");
        if outcome.is_satisfied() {
            return None;
        }

        let end = member.end_byte();
        let text = source.get(anchor..end)?;
        let fix = match outcome {
            SpacingOutcome::Satisfied | SpacingOutcome::InvalidConfig => None,
            SpacingOutcome::Shortfall(missing) => Some(Fix {
                offset: line_start,
                length: end - line_start,
                replacement: format!("{}{indent}{text}", index.newline().repeat(missing)),
            }),
            SpacingOutcome::Excess(extra) => {
                let start = index.line_start(anchor_line.checked_sub(extra)?)?;
                Some(Fix {
                    offset: start,
                    length: end - start,
                    replacement: format!("{indent}{text}"),
                })
            }
        };

        Some(Diagnostic {
            rule_name: RULE_NAME,
            severity: self.severity,
            offset: line_start,
            length: end - line_start,
            message: self.config.message(),
            fix,
            start: index.position(source, line_start),
            end: index.position(source, end),
        })
    }
}

/// Start of the comment block sitting directly above a member.
///
/// Comments attach when no blank line separates them from the member (or
/// from the comment below) and nothing but indentation precedes them on
/// their first line.
fn leading_comment_start(member: &MemberDecl<'_>, source: &str, index: &LineIndex) -> Option<usize> {
    let mut attached = None;
    let mut current_line = index.line_of(member.start_byte());
    let mut prev = member.head.prev_named_sibling();

    while let Some(node) = prev {
        if node.kind() != "comment" {
            break;
        }
        if index.line_of(node.end_byte()) + 1 < current_line {
            break;
        }

        let start_line = index.line_of(node.start_byte());
        let owns_line = index
            .line_start(start_line)
            .and_then(|line_start| source.get(line_start..node.start_byte()))
            .is_some_and(is_blank);
        if !owns_line {
            break;
        }

        attached = Some(node.start_byte());
        current_line = start_line;
        prev = node.prev_named_sibling();
    }

    attached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lint(source: &str, option: Option<&str>) -> Vec<Diagnostic> {
        LinesBetweenClassMembers::from_option(option)
            .lint_source(source, Dialect::TypeScript)
            .unwrap()
    }

    fn apply_fix(source: &str, fix: &Fix) -> String {
        let mut out = String::with_capacity(source.len() + fix.replacement.len());
        out.push_str(&source[..fix.offset]);
        out.push_str(&fix.replacement);
        out.push_str(&source[fix.end()..]);
        out
    }

    #[test]
    fn blank_line_between_methods_passes() {
        let source = "class A {\n  a() {}\n\n  b() {}\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn missing_blank_line_fails_with_fix() {
        let source = "class A {\n  a() {}\n  b() {}\n}\n";
        let diagnostics = lint(source, None);

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.message, "must have at least one new line between class methods");
        assert_eq!(diag.snippet(source), Some("  b() {}"));
        assert_eq!(diag.start.line, 2);
        assert_eq!(diag.start.character, 0);

        let fix = diag.fix.as_ref().unwrap();
        assert_eq!(fix.replacement, "\n  b() {}");
        let fixed = apply_fix(source, fix);
        assert_eq!(fixed, "class A {\n  a() {}\n\n  b() {}\n}\n");
        assert!(lint(&fixed, None).is_empty());
    }

    #[test]
    fn doc_comment_travels_with_member() {
        let source = "class A {\n  a() {}\n  /**\n   * Doc\n   */\n  b() {}\n}\n";
        let diagnostics = lint(source, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].start.line, 2);

        let fixed = apply_fix(source, diagnostics[0].fix.as_ref().unwrap());
        assert_eq!(fixed, "class A {\n  a() {}\n\n  /**\n   * Doc\n   */\n  b() {}\n}\n");
        assert!(lint(&fixed, None).is_empty());
    }

    #[test]
    fn blank_line_between_comment_and_member_detaches_comment() {
        let source = "class A {\n  a() {}\n  // stray\n\n  b() {}\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn trailing_comment_of_previous_member_does_not_attach() {
        let source = "class A {\n  a() {} // note\n  b() {}\n}\n";
        let diagnostics = lint(source, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].snippet(source), Some("  b() {}"));
    }

    #[test]
    fn first_member_under_header_is_exempt() {
        let source = "class A extends B implements C {\n  constructor() { super(); }\n}\n";
        assert!(lint(source, None).is_empty());
        assert!(lint(source, Some("2")).is_empty());
    }

    #[test]
    fn multiline_header_is_exempt() {
        let source = "class A\n  extends B\n  implements C, D<E> {\n  constructor() { super(); }\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn allman_brace_is_exempt() {
        let source = "class A\n{\n  constructor() {}\n\n  a() {}\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn generic_header_closing_before_brace_is_exempt() {
        let source = "class A<\n  T\n> {\n  a() {}\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn member_after_field_on_header_line_is_checked() {
        let source = "class A { x = 1;\n  a() {}\n}\n";
        assert_eq!(lint(source, None).len(), 1);
    }

    #[test]
    fn exact_spacing_shortfall() {
        let source = "class A {\n  a() {}\n\n  b() {}\n}\n";
        let diagnostics = lint(source, Some("2"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "must have 2 new line(s) between class methods");

        let fix = diagnostics[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacement, "\n  b() {}");
        let fixed = apply_fix(source, fix);
        assert_eq!(fixed, "class A {\n  a() {}\n\n\n  b() {}\n}\n");
        assert!(lint(&fixed, Some("2")).is_empty());
    }

    #[test]
    fn exact_spacing_excess() {
        let source = "class A {\n  a() {}\n\n\n\n  b() {}\n}\n";
        let diagnostics = lint(source, Some("1"));
        assert_eq!(diagnostics.len(), 1);

        let fix = diagnostics[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacement, "  b() {}");
        assert_eq!(fix.length, "\n\n  b() {}".len());
        let fixed = apply_fix(source, fix);
        assert_eq!(fixed, "class A {\n  a() {}\n\n  b() {}\n}\n");
        assert!(lint(&fixed, Some("1")).is_empty());
    }

    #[test]
    fn exact_zero_removes_blank_lines() {
        let source = "class A {\n  a() {}\n\n  b() {}\n}\n";
        let diagnostics = lint(source, Some("0"));
        assert_eq!(diagnostics.len(), 1);

        let fixed = apply_fix(source, diagnostics[0].fix.as_ref().unwrap());
        assert_eq!(fixed, "class A {\n  a() {}\n  b() {}\n}\n");
        assert!(lint(&fixed, Some("0")).is_empty());
    }

    #[test]
    fn invalid_option_reports_every_checked_member_without_fix() {
        let source = "class A {\n  constructor() {}\n\n  a() {}\n\n  b() {}\n}\n";
        let diagnostics = lint(source, Some("abc"));
        assert_eq!(diagnostics.len(), 2);
        for diag in &diagnostics {
            assert_eq!(
                diag.message,
                "invalid value provided for num lines configuration - abc, see docs for how to configure"
            );
            assert!(diag.fix.is_none());
        }
    }

    #[test]
    fn object_literal_members_are_ignored() {
        let source = "export default {\n  a() {},\n  b() {},\n};\nexport const x = {\n  a() {},\n  b() {},\n};\n";
        assert!(lint(source, None).is_empty());
        assert!(lint(source, Some("3")).is_empty());
    }

    #[test]
    fn decorators_travel_with_member() {
        let source = "class A {\n  a() {}\n  @Input()\n  b() {}\n}\n";
        let diagnostics = lint(source, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].start.line, 2);

        let fixed = apply_fix(source, diagnostics[0].fix.as_ref().unwrap());
        assert_eq!(fixed, "class A {\n  a() {}\n\n  @Input()\n  b() {}\n}\n");
    }

    #[test]
    fn comment_between_decorator_and_member_stays_attached() {
        let first = "class A {\n  @Input()\n  // doc\n  a() {}\n}\n";
        assert!(lint(first, None).is_empty());

        let spaced = "class A {\n  x = 1;\n\n  @Input()\n  // doc\n  a() {}\n}\n";
        assert!(lint(spaced, None).is_empty());

        let crowded = "class A {\n  x = 1;\n  @Input()\n  // doc\n  a() {}\n}\n";
        let diagnostics = lint(crowded, None);
        assert_eq!(diagnostics.len(), 1);
        let fixed = apply_fix(crowded, diagnostics[0].fix.as_ref().unwrap());
        assert_eq!(fixed, spaced);
    }

    #[test]
    fn crlf_files_get_crlf_fixes() {
        let source = "class A {\r\n  a() {}\r\n  b() {}\r\n}\r\n";
        let diagnostics = lint(source, None);
        assert_eq!(diagnostics.len(), 1);

        let fixed = apply_fix(source, diagnostics[0].fix.as_ref().unwrap());
        assert_eq!(fixed, "class A {\r\n  a() {}\r\n\r\n  b() {}\r\n}\r\n");
        assert!(lint(&fixed, None).is_empty());
    }

    #[test]
    fn members_sharing_a_line_are_skipped() {
        let source = "class A {\n  a() {} b() {}\n}\n";
        assert!(lint(source, None).is_empty());
    }

    #[test]
    fn severity_is_carried() {
        let rule = LinesBetweenClassMembers::default().with_severity(Severity::Warning);
        let diagnostics = rule
            .lint_source("class A {\n  a() {}\n  b() {}\n}\n", Dialect::TypeScript)
            .unwrap();
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].rule_name, RULE_NAME);
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = LinesBetweenClassMembers::default()
            .lint_source("", Dialect::TypeScript)
            .unwrap_err();
        assert!(matches!(err, LintError::EmptySource));
    }

    #[test]
    fn check_yields_members_in_order_and_is_reusable() {
        let source = "class A {\n  a() {}\n  b() {}\n  c() {}\n}\n";
        let mut parser = crate::ts::TypeScriptParser::new().unwrap();
        let parsed = parser.parse_with_source(source).unwrap();
        let index = LineIndex::new(source);
        let rule = LinesBetweenClassMembers::default();

        let first = rule.check(&parsed, &index).next().unwrap();
        assert_eq!(first.start.line, 2);
        assert_eq!(rule.check(&parsed, &index).count(), 2);
    }
}

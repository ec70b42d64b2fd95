use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use std::fmt;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    TypeScript,
    /// TypeScript with JSX. Also accepts plain JavaScript.
    Tsx,
}

impl Dialect {
    /// Pick the dialect from a file extension, `None` for files we don't lint.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    fn grammar(self) -> SupportLang {
        match self {
            Dialect::TypeScript => SupportLang::TypeScript,
            Dialect::Tsx => SupportLang::Tsx,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::TypeScript => write!(f, "TypeScript"),
            Dialect::Tsx => write!(f, "TSX"),
        }
    }
}

/// A tree-sitter parser bound to one dialect's grammar.
pub struct TypeScriptParser {
    inner: Parser,
    dialect: Dialect,
}

impl TypeScriptParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        Self::with_dialect(Dialect::default())
    }

    pub fn with_dialect(dialect: Dialect) -> Result<Self, TreeSitterError> {
        let mut inner = Parser::new();
        inner
            .set_language(&dialect.grammar().get_ts_language())
            .map_err(|_| TreeSitterError::LanguageSet { dialect })?;
        Ok(Self { inner, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.inner
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed {
                dialect: self.dialect,
            })
    }

    /// Parse `source` and keep it next to its tree, so nodes can be
    /// resolved back to text.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// Source text and the tree parsed from it.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.root_node().has_error()
    }

    /// ERROR and MISSING nodes, in document order.
    ///
    /// Subtrees without errors are not entered.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut found = Vec::new();
        let mut cursor = self.tree.walk();

        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                found.push(ErrorNode {
                    byte_start: node.start_byte(),
                    byte_end: node.end_byte(),
                });
            }

            if node.has_error() && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return found;
                }
            }
        }
    }

    pub fn node_text(&self, node: Node<'_>) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }
}

/// Byte span of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
}

//! Member declaration traversal.
//!
//! [`MemberVisitor`] walks a tree-sitter TypeScript tree depth-first and
//! hands every constructor or method declaration it meets to one of two
//! callbacks. Classification of the surrounding container is attached to
//! each [`MemberDecl`] so the caller decides what is eligible.

use tree_sitter::Node;

/// Node kinds that declare a callable member.
const MEMBER_KINDS: &[&str] = &[
    "method_definition",
    "method_signature",
    "abstract_method_signature",
];

/// Class node kinds whose body holds declared members.
const CLASS_DECLARATION_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    Method,
}

/// What a member declaration is a direct member of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberContainer {
    /// Body of a class declaration (including `export default class {}`).
    Class,
    /// Object literal, e.g. `export default { method() {} }`.
    Object,
    /// Interfaces, type literals, class expressions.
    Other,
}

/// A constructor or method declaration located in the tree.
#[derive(Debug, Clone, Copy)]
pub struct MemberDecl<'tree> {
    /// The declaration node itself.
    pub node: Node<'tree>,
    /// First node belonging to the member: its topmost decorator, or `node`.
    pub head: Node<'tree>,
    pub kind: MemberKind,
    pub container: MemberContainer,
}

impl<'tree> MemberDecl<'tree> {
    /// Start of the member, decorators included.
    pub fn start_byte(&self) -> usize {
        self.head.start_byte()
    }

    pub fn end_byte(&self) -> usize {
        self.node.end_byte()
    }

    /// The containing body node (`class_body`, `object`, ...).
    pub fn body(&self) -> Option<Node<'tree>> {
        self.node.parent()
    }

    /// True when no other member precedes this one in its body.
    pub fn is_first_member(&self) -> bool {
        let mut prev = self.head.prev_named_sibling();
        while let Some(node) = prev {
            if node.kind() != "comment" {
                return false;
            }
            prev = node.prev_named_sibling();
        }
        true
    }
}

/// Explicit traversal parameterized by per-kind callbacks.
pub struct MemberVisitor<C, M> {
    pub on_constructor: C,
    pub on_method: M,
}

impl<C, M> MemberVisitor<C, M> {
    pub fn new(on_constructor: C, on_method: M) -> Self {
        Self {
            on_constructor,
            on_method,
        }
    }

    /// Visit every member declaration under `root`, nested ones included.
    pub fn walk<'tree>(&mut self, root: Node<'tree>, source: &str)
    where
        C: FnMut(MemberDecl<'tree>),
        M: FnMut(MemberDecl<'tree>),
    {
        if let Some(decl) = classify(root, source) {
            match decl.kind {
                MemberKind::Constructor => (self.on_constructor)(decl),
                MemberKind::Method => (self.on_method)(decl),
            }
        }

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            self.walk(child, source);
        }
    }
}

/// Collect every member declaration under `root` in source order.
pub fn collect_members<'tree>(root: Node<'tree>, source: &str) -> Vec<MemberDecl<'tree>> {
    let members = std::cell::RefCell::new(Vec::new());
    let mut visitor = MemberVisitor::new(
        |decl: MemberDecl<'tree>| members.borrow_mut().push(decl),
        |decl: MemberDecl<'tree>| members.borrow_mut().push(decl),
    );
    visitor.walk(root, source);
    members.into_inner()
}

fn classify<'tree>(node: Node<'tree>, source: &str) -> Option<MemberDecl<'tree>> {
    if !MEMBER_KINDS.contains(&node.kind()) || is_accessor(node) {
        return None;
    }

    let kind = match node.child_by_field_name("name") {
        Some(name) if name_text(name, source) == "constructor" => MemberKind::Constructor,
        _ => MemberKind::Method,
    };

    Some(MemberDecl {
        node,
        head: decorated_head(node),
        kind,
        container: container_of(node),
    })
}

fn name_text<'s>(name: Node<'_>, source: &'s str) -> &'s str {
    source
        .get(name.byte_range())
        .unwrap_or_default()
        .trim_matches(|c| c == '"' || c == '\'')
}

/// `get x()` / `set x(v)` carry an anonymous `get`/`set` keyword child.
fn is_accessor(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && matches!(child.kind(), "get" | "set"));
    found
}

/// Decorators may be parsed as siblings preceding the declaration, possibly
/// with comments between them. The head is the topmost decorator; comments
/// above it are left to the caller.
fn decorated_head(node: Node<'_>) -> Node<'_> {
    let mut head = node;
    let mut prev = node.prev_named_sibling();
    while let Some(sibling) = prev {
        match sibling.kind() {
            "decorator" => head = sibling,
            "comment" => {}
            _ => break,
        }
        prev = sibling.prev_named_sibling();
    }
    head
}

fn container_of(node: Node<'_>) -> MemberContainer {
    let Some(parent) = node.parent() else {
        return MemberContainer::Other;
    };

    match parent.kind() {
        "class_body" => {
            let Some(class) = parent.parent() else {
                return MemberContainer::Other;
            };
            if CLASS_DECLARATION_KINDS.contains(&class.kind()) {
                return MemberContainer::Class;
            }
            // `export default class { ... }` parses as a class expression
            let exported = class.kind() == "class"
                && class
                    .parent()
                    .is_some_and(|grand| grand.kind() == "export_statement");
            if exported {
                MemberContainer::Class
            } else {
                MemberContainer::Other
            }
        }
        "object" => MemberContainer::Object,
        _ => MemberContainer::Other,
    }
}

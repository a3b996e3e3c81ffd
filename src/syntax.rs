//! C syntax tree access
//!
//! Wraps tree-sitter's C grammar. Rule sets and template generators never
//! touch the parser directly; they ask for [`Capture`]s of the node kinds
//! they care about and use the bounded navigation helpers below.

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Upper bound on parent-link walks
pub const MAX_ANCESTOR_DEPTH: usize = 512;

/// Name used when a function declarator has no identifier
pub const UNKNOWN_FUNCTION: &str = "unknown_function";

/// Grammar node kinds used by the checks
pub mod kind {
    pub const FUNCTION_DEFINITION: &str = "function_definition";
    pub const FUNCTION_DECLARATOR: &str = "function_declarator";
    pub const IDENTIFIER: &str = "identifier";
    pub const PARAMETER_LIST: &str = "parameter_list";
    pub const PARAMETER_DECLARATION: &str = "parameter_declaration";
    pub const STRUCT_SPECIFIER: &str = "struct_specifier";
    pub const FIELD_DECLARATION_LIST: &str = "field_declaration_list";
    pub const FIELD_DECLARATION: &str = "field_declaration";
    pub const INIT_DECLARATOR: &str = "init_declarator";
    pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
    pub const BINARY_EXPRESSION: &str = "binary_expression";
    pub const CONDITIONAL_EXPRESSION: &str = "conditional_expression";
    pub const UNARY_EXPRESSION: &str = "unary_expression";
    pub const POINTER_DECLARATOR: &str = "pointer_declarator";
    pub const DECLARATION: &str = "declaration";
    pub const IF_STATEMENT: &str = "if_statement";
    pub const FOR_STATEMENT: &str = "for_statement";
    pub const WHILE_STATEMENT: &str = "while_statement";
    pub const DO_STATEMENT: &str = "do_statement";
    pub const SWITCH_STATEMENT: &str = "switch_statement";
    pub const COMPOUND_STATEMENT: &str = "compound_statement";
    pub const PREPROC_INCLUDE: &str = "preproc_include";
}

/// Errors from the parser collaborator
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load C grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,
}

/// Category of a captured node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// `function_definition`
    FunctionDef,
    /// `if`, `for`, `while` and `do` statements
    ControlStmt,
    /// `switch` statements
    SwitchStmt,
    /// `struct_specifier`
    StructSpec,
    /// Nodes whose direct children are binary-style operators
    OperatorHost,
}

impl CaptureKind {
    /// Classify a grammar node kind
    pub fn of(node_kind: &str) -> Option<Self> {
        match node_kind {
            kind::FUNCTION_DEFINITION => Some(CaptureKind::FunctionDef),
            kind::IF_STATEMENT | kind::FOR_STATEMENT | kind::WHILE_STATEMENT | kind::DO_STATEMENT => {
                Some(CaptureKind::ControlStmt)
            }
            kind::SWITCH_STATEMENT => Some(CaptureKind::SwitchStmt),
            kind::STRUCT_SPECIFIER => Some(CaptureKind::StructSpec),
            kind::INIT_DECLARATOR
            | kind::ASSIGNMENT_EXPRESSION
            | kind::BINARY_EXPRESSION
            | kind::CONDITIONAL_EXPRESSION => Some(CaptureKind::OperatorHost),
            _ => None,
        }
    }
}

/// A node matched by a capture query
#[derive(Debug, Clone, Copy)]
pub struct Capture<'tree> {
    pub kind: CaptureKind,
    pub node: Node<'tree>,
}

/// Parsed C source
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
}

/// Parse C source text
pub fn parse(source: &str) -> Result<SyntaxTree<'_>, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_c::LANGUAGE.into())?;
    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    if tree.root_node().has_error() {
        log::trace!("syntax tree contains error nodes");
    }
    Ok(SyntaxTree { tree, source })
}

impl<'src> SyntaxTree<'src> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Source text covered by `node`
    pub fn text(&self, node: Node<'_>) -> &'src str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// All nodes of the requested kinds, in document order
    pub fn captures(&self, kinds: &[CaptureKind]) -> Vec<Capture<'_>> {
        let mut found = Vec::new();
        walk(self.root(), |node| {
            if let Some(kind) = CaptureKind::of(node.kind()) {
                if kinds.contains(&kind) {
                    found.push(Capture { kind, node });
                }
            }
        });
        found
    }

    /// Declared name of a function definition
    pub fn function_name(&self, function: Node<'_>) -> String {
        find_descendant(function, kind::FUNCTION_DECLARATOR)
            .and_then(|declarator| child_of_kind(declarator, kind::IDENTIFIER))
            .map(|ident| self.text(ident).to_string())
            .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string())
    }

    /// Raw text of each parameter declaration of a function definition
    pub fn function_parameters(&self, function: Node<'_>) -> Vec<String> {
        find_descendant(function, kind::FUNCTION_DECLARATOR)
            .and_then(|declarator| child_of_kind(declarator, kind::PARAMETER_LIST))
            .map(|list| {
                children_of_kind(list, kind::PARAMETER_DECLARATION)
                    .into_iter()
                    .map(|param| self.text(param).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Pre-order traversal of `root` and all its descendants
pub fn walk<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// First descendant of `node` (depth-first, excluding `node`) with the given kind
pub fn find_descendant<'tree>(node: Node<'tree>, node_kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        if cursor.node().kind() == node_kind {
            return Some(cursor.node());
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() || cursor.node() == node {
                return None;
            }
        }
    }
}

/// First direct child with the given kind
pub fn child_of_kind<'tree>(node: Node<'tree>, node_kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == node_kind);
    found
}

/// All direct children with the given kind
pub fn children_of_kind<'tree>(node: Node<'tree>, node_kind: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.kind() == node_kind)
        .collect();
    found
}

/// All direct children, named and anonymous
pub fn children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).collect();
    found
}

/// Parent chain of `node`, nearest first, capped at [`MAX_ANCESTOR_DEPTH`]
pub fn ancestors<'tree>(node: Node<'tree>) -> impl Iterator<Item = Node<'tree>> {
    std::iter::successors(node.parent(), |n| n.parent()).take(MAX_ANCESTOR_DEPTH)
}

/// Whether any ancestor of `node` has one of `kinds`
pub fn has_ancestor(node: Node<'_>, kinds: &[&str]) -> bool {
    ancestors(node).any(|ancestor| kinds.contains(&ancestor.kind()))
}

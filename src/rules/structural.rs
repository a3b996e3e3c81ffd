//! Tree-driven checks: operator spacing, brace placement, nesting depth and
//! documentation presence

use super::CheckContext;
use crate::diagnostic::Diagnostic;
use crate::position::Range;
use crate::rule::codes;
use crate::syntax::{self, kind, CaptureKind, SyntaxTree};
use tree_sitter::Node;

/// Operators that need a space on both sides
const SPACED_OPERATORS: &[&str] = &[
    "=", "+", "-", "*", "/", "%", "<", ">", "<=", ">=", "==", "!=", "&&", "||", "?", ":",
];

/// Compound assignment and increment forms, never spacing-checked
const COMPOUND_OPERATORS: &[&str] = &[
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

/// Kinds that count toward nesting depth
const NESTING_KINDS: &[&str] = &[
    kind::IF_STATEMENT,
    kind::FOR_STATEMENT,
    kind::WHILE_STATEMENT,
    kind::DO_STATEMENT,
    kind::SWITCH_STATEMENT,
];

/// Kinds under which `*` declares a pointer rather than multiplying
const POINTER_CONTEXTS: &[&str] = &[
    kind::POINTER_DECLARATOR,
    kind::PARAMETER_DECLARATION,
    kind::DECLARATION,
];

/// Flag the document when it does not open with a comment
pub fn check_file_header(ctx: &CheckContext<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::DOCUMENTATION) {
        return;
    }
    if ctx.text.trim().starts_with("/*") {
        return;
    }
    let first_len = ctx.line(0).map(str::len).unwrap_or(0);
    out.push(ctx.diagnostic(
        codes::DOCUMENTATION,
        "File missing a header comment",
        Range::on_line(0, 0, first_len),
    ));
}

/// Flag functions without a contract and structs without a description
pub fn check_documentation(ctx: &CheckContext<'_>, tree: &SyntaxTree<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::DOCUMENTATION) {
        return;
    }

    for capture in tree.captures(&[CaptureKind::FunctionDef, CaptureKind::StructSpec]) {
        let node = capture.node;
        let row = node.start_position().row;
        let above = row.checked_sub(1).and_then(|r| ctx.line(r)).map(str::trim);

        let message = match capture.kind {
            CaptureKind::FunctionDef => {
                if above.is_some_and(|line| line.ends_with("**/")) {
                    continue;
                }
                format!("Function '{}' missing a contract", tree.function_name(node))
            }
            CaptureKind::StructSpec => {
                let (Some(name), Some(_)) = (
                    node.child_by_field_name("name"),
                    syntax::child_of_kind(node, kind::FIELD_DECLARATION_LIST),
                ) else {
                    continue;
                };
                if above == Some("*/") {
                    continue;
                }
                format!("Struct '{}' missing a description", tree.text(name))
            }
            _ => continue,
        };

        let start = ctx.index.offset_of(row, node.start_position().column);
        let line_end = ctx.index.offset_of(row, 0) + ctx.line(row).map(str::len).unwrap_or(0);
        out.push(ctx.diagnostic(codes::DOCUMENTATION, message, ctx.range(start, line_end.max(start))));
    }
}

/// Flag control statements nested deeper than the configured maximum
pub fn check_nesting(ctx: &CheckContext<'_>, tree: &SyntaxTree<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::EXCESSIVE_NESTING) {
        return;
    }
    let max = ctx.style.max_nesting_depth;

    for capture in tree.captures(&[CaptureKind::ControlStmt, CaptureKind::SwitchStmt]) {
        let depth = nesting_depth(capture.node);
        if depth <= max {
            continue;
        }
        let start = node_offset(ctx, capture.node);
        let end = capture
            .node
            .child(0)
            .map(|keyword| start + tree.text(keyword).len())
            .unwrap_or(start);
        out.push(ctx.diagnostic(
            codes::EXCESSIVE_NESTING,
            format!(
                "Nesting depth {} exceeds the maximum of {}; consider extracting a function",
                depth, max
            ),
            ctx.range(start, end),
        ));
    }
}

/// 1 + number of enclosing control statements
pub fn nesting_depth(node: Node<'_>) -> usize {
    1 + syntax::ancestors(node)
        .filter(|ancestor| NESTING_KINDS.contains(&ancestor.kind()))
        .count()
}

/// Flag binary-style operators missing a space on either side
pub fn check_operator_spacing(ctx: &CheckContext<'_>, tree: &SyntaxTree<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::OPERATOR_SPACING) {
        return;
    }
    let bytes = ctx.text.as_bytes();
    let mut found = Vec::new();

    for capture in tree.captures(&[CaptureKind::OperatorHost]) {
        for child in syntax::children(capture.node) {
            if child.is_named() {
                continue;
            }
            let op = tree.text(child);
            if !SPACED_OPERATORS.contains(&op) || should_skip_operator(child, op) {
                continue;
            }

            let start = node_offset(ctx, child);
            let end = start + op.len();
            let before = start
                .checked_sub(1)
                .and_then(|i| bytes.get(i))
                .is_some_and(|b| is_spacing(*b));
            let after = bytes.get(end).is_some_and(|b| is_spacing(*b));

            if !(before && after) {
                found.push(ctx.diagnostic(
                    codes::OPERATOR_SPACING,
                    format!("Operator '{}' should have spaces on both sides", op),
                    ctx.range(start, end),
                ));
            }
        }
    }

    found.sort_by_key(|d| d.range.start);
    out.extend(found);
}

fn is_spacing(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\r')
}

/// Whether an operator token is exempt from spacing checks
///
/// Compound and increment forms are exempt, as are unary signs, the angle
/// brackets of `#include <...>` and the `*` of pointer declarations.
pub fn should_skip_operator(operator: Node<'_>, op: &str) -> bool {
    if COMPOUND_OPERATORS.contains(&op) {
        return true;
    }
    if matches!(op, "!" | "+" | "-")
        && operator
            .parent()
            .is_some_and(|parent| parent.kind() == kind::UNARY_EXPRESSION)
    {
        return true;
    }
    if matches!(op, "<" | ">") && syntax::has_ancestor(operator, &[kind::PREPROC_INCLUDE]) {
        return true;
    }
    op == "*" && syntax::has_ancestor(operator, POINTER_CONTEXTS)
}

/// Brace placement for functions and control statements
pub fn check_braces(ctx: &CheckContext<'_>, tree: &SyntaxTree<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.any_active(&[
        codes::FUNCTION_BRACE_STYLE,
        codes::MANDATORY_BRACES,
        codes::CONTROL_BRACE_NEWLINE,
        codes::CONTROL_BRACE_SPACING,
    ]) {
        return;
    }
    let mut found = Vec::new();

    for capture in tree.captures(&[CaptureKind::FunctionDef, CaptureKind::ControlStmt]) {
        match capture.kind {
            CaptureKind::FunctionDef => check_function_brace(ctx, capture.node, &mut found),
            CaptureKind::ControlStmt => check_control_brace(ctx, capture.node, &mut found),
            _ => {}
        }
    }

    found.sort_by_key(|d| d.range.start);
    out.extend(found);
}

fn check_function_brace(ctx: &CheckContext<'_>, function: Node<'_>, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::FUNCTION_BRACE_STYLE) {
        return;
    }
    let Some(body) = syntax::child_of_kind(function, kind::COMPOUND_STATEMENT) else {
        return;
    };
    if body.start_position().row == function.start_position().row {
        let brace = node_offset(ctx, body);
        out.push(ctx.diagnostic(
            codes::FUNCTION_BRACE_STYLE,
            "Function opening brace should be on its own line (Linus style)",
            ctx.range(brace, brace + 1),
        ));
    }
}

fn check_control_brace(ctx: &CheckContext<'_>, statement: Node<'_>, out: &mut Vec<Diagnostic>) {
    let Some(body) = syntax::child_of_kind(statement, kind::COMPOUND_STATEMENT) else {
        if ctx.rules.is_active(codes::MANDATORY_BRACES) {
            let start = node_offset(ctx, statement);
            let end = start + (statement.end_byte() - statement.start_byte());
            out.push(ctx.diagnostic(
                codes::MANDATORY_BRACES,
                "Always use curly braces for control structures, even single statements",
                ctx.range(start, end),
            ));
        }
        return;
    };

    let brace = node_offset(ctx, body);
    if body.start_position().row != statement.start_position().row {
        if ctx.rules.is_active(codes::CONTROL_BRACE_NEWLINE) {
            out.push(ctx.diagnostic(
                codes::CONTROL_BRACE_NEWLINE,
                "Control structure opening brace should be on the same line",
                ctx.range(brace, brace + 1),
            ));
        }
    } else if ctx.rules.is_active(codes::CONTROL_BRACE_SPACING)
        && brace
            .checked_sub(1)
            .and_then(|i| ctx.text.as_bytes().get(i))
            != Some(&b' ')
    {
        out.push(ctx.diagnostic(
            codes::CONTROL_BRACE_SPACING,
            "Put a space before '{'",
            ctx.range(brace, brace + 1),
        ));
    }
}

/// Absolute offset of a node's start point
fn node_offset(ctx: &CheckContext<'_>, node: Node<'_>) -> usize {
    let point = node.start_position();
    ctx.index.offset_of(point.row, point.column)
}

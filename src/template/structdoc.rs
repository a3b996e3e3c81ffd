//! Struct description blocks

use super::{GenerationReport, TemplateKind};
use crate::document::SourceDocument;
use crate::position::Position;
use crate::syntax::{self, kind, CaptureKind, SyntaxTree};
use std::collections::HashSet;
use tree_sitter::Node;

/// Insert a description above every named struct definition lacking one
pub fn generate_struct_docs(document: &SourceDocument) -> GenerationReport {
    let mut report = GenerationReport::new(TemplateKind::Structs);
    let tree = match syntax::parse(document.text()) {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("Cannot generate struct docs for {}: {}", document.uri(), e);
            return report;
        }
    };

    let mut planned_rows = HashSet::new();
    for capture in tree.captures(&[CaptureKind::StructSpec]).into_iter().rev() {
        let node = capture.node;
        let (Some(name), Some(fields)) = (
            node.child_by_field_name("name"),
            syntax::child_of_kind(node, kind::FIELD_DECLARATION_LIST),
        ) else {
            continue;
        };

        let row = node.start_position().row;
        let above = row.checked_sub(1).and_then(|r| document.line(r));
        if above.is_some_and(|line| line.trim() == "*/") {
            log::trace!("Struct '{}' already described", tree.text(name));
            continue;
        }
        if !planned_rows.insert(row) {
            continue;
        }

        let mut block = struct_block(tree.text(name), &members(&tree, fields));
        block.push('\n');
        report.plan.insert(Position::new(row, 0), block);
    }

    report
}

/// Field declarations without their terminating `;`
fn members(tree: &SyntaxTree<'_>, fields: Node<'_>) -> Vec<String> {
    syntax::children_of_kind(fields, kind::FIELD_DECLARATION)
        .into_iter()
        .map(|field| {
            let text = tree.text(field);
            text.strip_suffix(';').unwrap_or(text).to_string()
        })
        .collect()
}

fn struct_block(name: &str, members: &[String]) -> String {
    let mut block = format!("/* {}\n *\n * [DESCRIPTION]\n *\n * Members:\n *", name);
    for member in members {
        block.push_str(&format!("      {}: [DESCRIPTION]\n *", member));
    }
    block.push_str("\n * Invariants: [DESCRIBE INVARIANTS]\n *\n */");
    block
}

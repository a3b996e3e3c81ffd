//! Function contract blocks
//!
//! Functions are visited bottom to top. Every insertion lands above all the
//! functions still waiting, so positions taken from the original text stay
//! valid for the whole batch.

use super::{GenerationReport, TemplateKind};
use crate::document::SourceDocument;
use crate::position::Position;
use crate::rules::lexical::strip_comments;
use crate::syntax::{self, kind, CaptureKind, SyntaxTree};
use std::collections::HashSet;
use tree_sitter::Node;

pattern!(ASSERT_CALL, r"\bassert\s*\([^)]+\)");
pattern!(ALLOCATION_CALL, r"\b(?:malloc|calloc|realloc)\s*\([^)]+\)");
pattern!(FREE_CALL, r"\bfree\s*\([^)]+\)");
pattern!(CONSTRUCTOR_CALL, r"\b[A-Z][a-zA-Z]*_(?:new|free)\s*\([^)]*\)");
pattern!(EXIT_CALL, r"\b(?:exit|abort)\s*\([^)]*\)");

/// Insert a contract above every undocumented function definition
pub fn generate_contracts(document: &SourceDocument) -> GenerationReport {
    let mut report = GenerationReport::new(TemplateKind::Contracts);
    let tree = match syntax::parse(document.text()) {
        Ok(tree) => tree,
        Err(e) => {
            log::warn!("Cannot generate contracts for {}: {}", document.uri(), e);
            return report;
        }
    };

    let mut planned_rows = HashSet::new();
    for capture in tree.captures(&[CaptureKind::FunctionDef]).into_iter().rev() {
        let function = capture.node;
        let row = function.start_position().row;
        let name = tree.function_name(function);

        if is_documented(document, row) {
            log::trace!("Function '{}' already has a contract", name);
            continue;
        }
        if !planned_rows.insert(row) {
            continue;
        }

        let parameters = tree.function_parameters(function);
        let notes = body_notes(&tree, function);
        let mut block = contract_block(&name, &parameters, &notes);
        block.push('\n');
        report.plan.insert(Position::new(row, 0), block);
    }

    log::debug!("Planned {} contract(s) for {}", report.generated(), document.uri());
    report
}

/// Whether the line above `row` closes a contract
fn is_documented(document: &SourceDocument, row: usize) -> bool {
    row.checked_sub(1)
        .and_then(|above| document.line(above))
        .is_some_and(|line| line.trim().ends_with("**/"))
}

/// Calls in the function body worth mentioning in the contract
///
/// Each distinct match is reported once, grouped by pattern.
pub fn body_notes(tree: &SyntaxTree<'_>, function: Node<'_>) -> Vec<String> {
    let Some(body) = syntax::child_of_kind(function, kind::COMPOUND_STATEMENT) else {
        return Vec::new();
    };
    let text: String = tree
        .text(body)
        .lines()
        .map(|line| strip_comments(line, false).text)
        .collect();
    notes_in(&text)
}

fn notes_in(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    [
        &*ASSERT_CALL,
        &*ALLOCATION_CALL,
        &*FREE_CALL,
        &*CONSTRUCTOR_CALL,
        &*EXIT_CALL,
    ]
    .into_iter()
    .flat_map(|pattern| pattern.find_iter(text))
    .map(|m| m.as_str().to_string())
    .filter(|note| seen.insert(note.clone()))
    .collect()
}

fn contract_block(name: &str, parameters: &[String], notes: &[String]) -> String {
    let mut block = format!("/******* {} *******\n *\n * [PURPOSE]\n *\n * Parameters:\n *", name);
    if parameters.is_empty() {
        block.push_str("None");
    }
    for parameter in parameters {
        block.push_str(&format!("      {}: [DESCRIPTION]\n *", parameter));
    }

    block.push_str("\n * Return: [RETURN]\n *\n * Expects: [EXPECTS]\n *\n * Notes:\n *");
    if notes.is_empty() {
        block.push_str("None");
    }
    for note in notes {
        block.push_str(&format!("      [NOTE \"{}\"]\n *", note));
    }

    block.push_str(&format!("\n *********{}********/", "*".repeat(name.len())));
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generated(source: &str) -> String {
        let mut doc = SourceDocument::new("t.c", source);
        let report = generate_contracts(&doc);
        doc.apply(&report.plan);
        doc.text().to_string()
    }

    const FOO: &str = "int foo(int a)\n{\n        return a;\n}\n";
    const BAR: &str = "void bar(void)\n{\n}\n";

    #[test]
    fn test_contract_text() {
        let expected = "/******* foo *******
 *
 * [PURPOSE]
 *
 * Parameters:
 *      int a: [DESCRIPTION]
 *
 * Return: [RETURN]
 *
 * Expects: [EXPECTS]
 *
 * Notes:
 *None
 ********************/
int foo(int a)
{
        return a;
}
";
        assert_eq!(generated(FOO), expected);
    }

    #[test]
    fn test_border_tracks_name_length() {
        let block = contract_block("average", &[], &[]);
        let last = block.lines().last().unwrap();
        assert_eq!(last, format!(" {}/", "*".repeat(9 + 7 + 8)));
        assert!(block.starts_with("/******* average *******\n"));
    }

    #[test]
    fn test_batch_matches_isolated_generation() {
        let combined = generated(&format!("{}\n{}", FOO, BAR));
        let isolated = format!("{}\n{}", generated(FOO), generated(BAR));
        assert_eq!(combined, isolated);

        let foo_at = combined.find("int foo(int a)").unwrap();
        let bar_at = combined.find("void bar(void)").unwrap();
        assert!(combined[..foo_at].ends_with("********************/\n"));
        assert!(combined[..bar_at].ends_with(&format!(" {}/\n", "*".repeat(20))));
        assert!(combined.contains(" *      void: [DESCRIPTION]\n"));
    }

    #[test]
    fn test_documented_functions_are_skipped() {
        let source = format!("{}\n{}", generated(FOO), BAR);
        let doc = SourceDocument::new("t.c", source.as_str());
        let report = generate_contracts(&doc);
        assert_eq!(report.generated(), 1);

        let mut doc = doc;
        doc.apply(&report.plan);
        assert!(generate_contracts(&doc).already_documented());
    }

    #[test]
    fn test_notes_from_body() {
        let source = "Seq_T build(int n)
{
        assert(n > 0);
        char *p = malloc(n);
        /* free(q) is handled by the caller */
        free(p);
        free(p);
        Seq_T s = Seq_new(10);
        if (s == NULL) {
                abort();
        }
        return s;
}
";
        let tree = syntax::parse(source).unwrap();
        let function = tree.captures(&[CaptureKind::FunctionDef])[0].node;
        assert_eq!(
            body_notes(&tree, function),
            vec![
                "assert(n > 0)".to_string(),
                "malloc(n)".to_string(),
                "free(p)".to_string(),
                "Seq_new(10)".to_string(),
                "abort()".to_string(),
            ]
        );
    }

    #[test]
    fn test_notes_in_block() {
        let block = contract_block("f", &["int n".to_string()], &["exit(1)".to_string()]);
        assert!(block.contains(" * Notes:\n *      [NOTE \"exit(1)\"]\n *\n *********"));
        assert!(block.contains(" * Parameters:\n *      int n: [DESCRIPTION]\n *\n * Return:"));
    }

    #[test]
    fn test_pointer_returning_function_name() {
        let text = generated("char *dup(const char *s)\n{\n        return 0;\n}\n");
        assert!(text.starts_with("/******* dup *******\n"));
        assert!(text.contains(" *      const char *s: [DESCRIPTION]\n"));
    }

    #[test]
    fn test_no_functions() {
        let doc = SourceDocument::new("t.c", "int x;\n");
        assert!(generate_contracts(&doc).already_documented());
    }
}

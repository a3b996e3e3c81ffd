//! End-to-end behavior of the lint40 library

use lint40::config::Config;
use lint40::rule::codes;
use lint40::template::{self, TemplateKind};
use lint40::{Diagnostic, Engine, Mode, Range, Session, SourceDocument};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn lint(source: &str, mode: Mode) -> Vec<Diagnostic> {
    Engine::new(Config::default()).lint_source(source, mode)
}

fn of<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Vec<&'a Diagnostic> {
    diagnostics.iter().filter(|d| d.code == code).collect()
}

#[test]
fn test_line_length_boundary() {
    let at_limit = format!("int {};\n", "x".repeat(75));
    assert_eq!(at_limit.trim_end().len(), 80);
    assert!(of(&lint(&at_limit, Mode::Draft), codes::LINE_LENGTH).is_empty());

    let over = format!("int {};\n", "x".repeat(76));
    let diagnostics = lint(&over, Mode::Draft);
    let long = of(&diagnostics, codes::LINE_LENGTH);
    assert_eq!(long.len(), 1);
    assert!(long[0].message.contains("81"));
}

#[test]
fn test_one_tab_diagnostic_per_tab() {
    let diagnostics = lint("\tint a;\t\t/* x */\n", Mode::Draft);
    let tabs = of(&diagnostics, codes::TAB);
    assert_eq!(tabs.len(), 3);
    assert!(tabs.iter().all(|d| d.range.len() == 1));
}

#[test]
fn test_pointer_style() {
    let diagnostics = lint("int* ptr;\n", Mode::Draft);
    let pointer = of(&diagnostics, codes::POINTER_STYLE);
    assert_eq!(pointer.len(), 1);
    assert_eq!(pointer[0].range, Range::on_line(0, 0, 4));

    assert!(of(&lint("int *ptr;\n", Mode::Draft), codes::POINTER_STYLE).is_empty());
    let product = lint("int result = a * b;\n", Mode::Draft);
    assert!(of(&product, codes::POINTER_STYLE).is_empty());
    assert!(of(&product, codes::OPERATOR_SPACING).is_empty());
}

#[test]
fn test_comma_and_keyword_spacing() {
    assert_eq!(of(&lint("func(a,b,c);\n", Mode::Draft), codes::COMMA_SPACING).len(), 2);
    assert!(of(&lint("func(a, b, c);\n", Mode::Draft), codes::COMMA_SPACING).is_empty());

    let wrap = |line: &str| format!("void f(int x)\n{{\n        {}\n                x = 1;\n        }}\n}}\n", line);
    assert_eq!(of(&lint(&wrap("if(x > 5) {"), Mode::Draft), codes::KEYWORD_SPACING).len(), 1);
    assert!(of(&lint(&wrap("if (x > 5) {"), Mode::Draft), codes::KEYWORD_SPACING).is_empty());
}

#[test]
fn test_operator_spacing_properties() {
    for source in ["int x=5;\n", "int x= 5;\n", "int x =5;\n"] {
        assert!(!of(&lint(source, Mode::Draft), codes::OPERATOR_SPACING).is_empty(), "{}", source);
    }
    assert!(of(&lint("int x = 5;\n", Mode::Draft), codes::OPERATOR_SPACING).is_empty());
    assert!(of(&lint("#include <stdio.h>\n", Mode::Draft), codes::OPERATOR_SPACING).is_empty());

    let comparison = "void f(int x)\n{\n        if (x<5) {\n                x = 1;\n        }\n}\n";
    assert!(!of(&lint(comparison, Mode::Draft), codes::OPERATOR_SPACING).is_empty());
}

#[test]
fn test_review_adds_documentation_checks() {
    let source = "struct point {\n        int x;\n};\n\nint area(int w)\n{\n        return w;\n}\n";
    let draft = lint(source, Mode::Draft);
    assert!(of(&draft, codes::DOCUMENTATION).is_empty());

    let review = lint(source, Mode::Review);
    let messages: Vec<&str> = of(&review, codes::DOCUMENTATION)
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "File missing a header comment",
            "Struct 'point' missing a description",
            "Function 'area' missing a contract",
        ]
    );
}

#[test]
fn test_generated_docs_satisfy_review() {
    let source = "struct point {\n        int x;\n};\n\nint area(int w)\n{\n        return w;\n}\n";
    let mut doc = SourceDocument::new("shapes.c", source);
    template::generate_into(TemplateKind::Structs, &mut doc, "");
    template::generate_into(TemplateKind::Contracts, &mut doc, "");
    template::generate_into(TemplateKind::Header, &mut doc, "01/01/2026");

    let review = Engine::new(Config::default()).lint_document(&doc, Mode::Review);
    assert!(of(&review, codes::DOCUMENTATION).is_empty(), "{:#?}", review);
}

#[test]
fn test_toggle_cycle_and_clearing() {
    let mut session = Session::new(Engine::new(Config::default()));
    session.open(SourceDocument::new("a.c", "int x=5;\n"));
    session.open(SourceDocument::new("b.c", "\tint y;\n"));
    let start = session.mode();

    session.toggle();
    session.toggle();
    assert_eq!(session.mode(), Mode::Off);
    assert_eq!(session.sink().total(), 0);

    session.toggle();
    assert_eq!(session.mode(), start);
    assert!(!session.sink().get("a.c").is_empty());
    assert!(!session.sink().get("b.c").is_empty());
}

#[test]
fn test_contract_generation_counts_and_idempotence() {
    let source = "/******* done *******\n *\n *********************/\nvoid done(void)\n{\n}\n\nint foo(int a)\n{\n        return a;\n}\n\nvoid bar(void)\n{\n}\n";
    let mut doc = SourceDocument::new("t.c", source);

    let first = template::generate_into(TemplateKind::Contracts, &mut doc, "");
    assert_eq!(first.generated(), 2);
    assert!(doc.text().starts_with("/******* done *******\n"));

    let second = template::generate_into(TemplateKind::Contracts, &mut doc, "");
    assert_eq!(second.generated(), 0);
    assert!(second.already_documented());
}

#[test]
fn test_contract_blocks_sit_above_their_functions() {
    let mut doc = SourceDocument::new("t.c", "int foo(int a)\n{\n        return a;\n}\n\nvoid bar(void)\n{\n}\n");
    template::generate_into(TemplateKind::Contracts, &mut doc, "");
    let text = doc.text();

    for name in ["foo", "bar"] {
        let open = text.find(&format!("/******* {} *******", name)).unwrap();
        let close = format!(" *********{}********/\n", "*".repeat(name.len()));
        let close_at = open + text[open..].find(&close).unwrap() + close.len();
        let definition = if name == "foo" { "int foo(int a)" } else { "void bar(void)" };
        assert!(text[close_at..].starts_with(definition), "{}", name);
    }
}

#[test]
fn test_file_runner() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.c");
    let bad = dir.path().join("bad.c");
    fs::write(&good, "int x = 5;\n").unwrap();
    fs::write(&bad, "int* p;\n").unwrap();

    let mut config = Config::default();
    config
        .rules
        .severity
        .insert(codes::POINTER_STYLE.to_string(), lint40::Severity::Warning);
    let result = Engine::new(config).lint(&[good, bad.clone()], Mode::Draft);

    assert_eq!(result.files_processed, 2);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.files_with_warnings, 1);
    assert_eq!(result.exit_code(), 1);
    assert_eq!(result.diagnostics[0].file, bad);
}

#[test]
fn test_unparseable_text_still_gets_line_checks() {
    let diagnostics = lint("}}}} int* p;\t{{{{\n", Mode::Draft);
    assert_eq!(of(&diagnostics, codes::POINTER_STYLE).len(), 1);
    assert_eq!(of(&diagnostics, codes::TAB).len(), 1);
}

#[test]
fn test_comments_are_removed_before_spacing_checks() {
    let flags = lint("call(/*flags*/0);\n", Mode::Draft);
    assert!(of(&flags, codes::PAREN_SPACING_AFTER).is_empty());

    let trailing = lint("g(x/* c */);\n", Mode::Draft);
    assert!(of(&trailing, codes::PAREN_SPACING_BEFORE).is_empty());

    let comma = lint("f(a,/*x*/b);\n", Mode::Draft);
    let found = of(&comma, codes::COMMA_SPACING);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].range, Range::on_line(0, 3, 4));
}

//! File header block

use super::{GenerationReport, TemplateKind};
use crate::document::SourceDocument;
use crate::position::Position;

/// Base name used when the document has no file name
pub const UNKNOWN_FILE: &str = "unknown.c";

const BORDER: usize = 62;

/// Today's date as `MM/DD/YYYY`
pub fn today() -> String {
    chrono::Local::now().format("%m/%d/%Y").to_string()
}

/// Prepend a header unless the first line already opens a `/**` comment
pub fn generate_header(document: &SourceDocument, date: &str) -> GenerationReport {
    let mut report = GenerationReport::new(TemplateKind::Header);
    let first = document.line(0).unwrap_or("").trim();
    if first.starts_with("/**") {
        log::trace!("{} already has a header", document.uri());
        return report;
    }

    let file_name = document.file_name().unwrap_or(UNKNOWN_FILE);
    report
        .plan
        .insert(Position::new(0, 0), header_block(file_name, date));
    report
}

fn header_block(file_name: &str, date: &str) -> String {
    let stars = "*".repeat(BORDER);
    format!(
        "/{stars}\n \
         *\n \
         *                     {file_name}\n \
         *\n \
         *      Assignment: [ASSIGNMENT]\n \
         *      Authors: [YOUR NAMES]\n \
         *      Date: {date}\n \
         *\n \
         *      [PURPOSE]\n \
         *\n \
         {stars}/\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXPECTED: &str = "/**************************************************************
 *
 *                     list.c
 *
 *      Assignment: [ASSIGNMENT]
 *      Authors: [YOUR NAMES]
 *      Date: 03/14/2026
 *
 *      [PURPOSE]
 *
 **************************************************************/

";

    #[test]
    fn test_header_text() {
        let doc = SourceDocument::new("src/list.c", "int x;\n");
        let report = generate_header(&doc, "03/14/2026");
        assert_eq!(report.generated(), 1);
        let mut doc = doc;
        doc.apply(&report.plan);
        assert_eq!(doc.text(), format!("{}int x;\n", EXPECTED));
    }

    #[test]
    fn test_border_lengths() {
        let block = header_block("a.c", "d");
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0].len(), 63);
        assert_eq!(lines[10].len(), 64);
        assert!(lines[10].starts_with(" *"));
        assert!(lines[10].ends_with("*/"));
    }

    #[test]
    fn test_existing_header_is_kept() {
        let doc = SourceDocument::new("a.c", "  /** existing */\nint x;\n");
        assert!(generate_header(&doc, "d").already_documented());
    }

    #[test]
    fn test_plain_comment_still_gets_header() {
        let doc = SourceDocument::new("a.c", "/* plain */\nint x;\n");
        assert_eq!(generate_header(&doc, "d").generated(), 1);
    }

    #[test]
    fn test_unknown_file_name() {
        let mut doc = SourceDocument::untitled("");
        let report = generate_header(&doc, "d");
        doc.apply(&report.plan);
        assert!(doc.text().contains("                     unknown.c\n"));
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[2..3], "/");
        assert_eq!(&date[5..6], "/");
    }
}

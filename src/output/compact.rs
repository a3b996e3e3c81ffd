//! Compact output formatter
//!
//! One line per diagnostic, minimal output for scripting.

use super::OutputFormatter;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Compact one-line-per-diagnostic formatter
pub struct CompactFormatter {
    /// Show severity prefix
    pub show_severity: bool,
    /// Show rule code
    pub show_rule: bool,
}

impl CompactFormatter {
    pub fn new() -> Self {
        Self {
            show_severity: true,
            show_rule: true,
        }
    }

    /// Hide severity prefix
    pub fn without_severity(mut self) -> Self {
        self.show_severity = false;
        self
    }

    /// Hide rule code
    pub fn without_rule(mut self) -> Self {
        self.show_rule = false;
        self
    }
}

impl Default for CompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CompactFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut line = format!(
            "{}:{}:{}:",
            diagnostic.file.display(),
            diagnostic.line(),
            diagnostic.column()
        );
        if self.show_severity {
            line.push_str(&format!(" {}", diagnostic.severity));
        }
        if self.show_rule {
            line.push_str(&format!(" [{}]", diagnostic.code));
        }
        line.push(' ');
        line.push_str(&diagnostic.message);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Range;
    use std::path::PathBuf;

    fn diag() -> Diagnostic {
        Diagnostic::new("tab", "Tab character found", Range::on_line(2, 4, 5))
            .with_file(PathBuf::from("src/a.c"))
    }

    #[test]
    fn test_compact_format() {
        let output = CompactFormatter::new().format_diagnostic(&diag());
        assert_eq!(output, "src/a.c:3:5: info [tab] Tab character found");
    }

    #[test]
    fn test_compact_without_parts() {
        let output = CompactFormatter::new()
            .without_severity()
            .without_rule()
            .format_diagnostic(&diag());
        assert_eq!(output, "src/a.c:3:5: Tab character found");
    }

    #[test]
    fn test_compact_result() {
        let result = LintResult {
            diagnostics: vec![diag(), diag()],
            files_processed: 1,
            info_count: 2,
            ..Default::default()
        };
        assert_eq!(CompactFormatter::new().format(&result).lines().count(), 2);
    }
}

//! GitHub Actions output formatter
//!
//! Outputs diagnostics in GitHub Actions workflow command format:
//! ::warning file={name},line={line},col={col}::{message}

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;

/// Formatter for GitHub Actions annotations
pub struct GithubFormatter {
    /// Whether to include summary
    pub show_summary: bool,
}

impl GithubFormatter {
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    /// Disable summary output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for GithubFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for GithubFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if self.show_summary && !result.diagnostics.is_empty() {
            output.push_str(&format!(
                "::notice::lint40: {} error(s), {} warning(s), {} info(s) in {} file(s)\n",
                result.error_count, result.warning_count, result.info_count, result.files_processed
            ));
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };

        let message = diagnostic
            .message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        format!(
            "::{} file={},line={},col={},endColumn={},title={}::{}",
            level,
            diagnostic.file.display(),
            diagnostic.line(),
            diagnostic.column(),
            diagnostic.range.end.character + 1,
            diagnostic.code,
            message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Range;
    use std::path::PathBuf;

    fn make_diagnostic(severity: Severity, code: &str, line: usize, msg: &str) -> Diagnostic {
        Diagnostic::new(code, msg, Range::on_line(line, 4, 6))
            .with_severity(severity)
            .with_file(PathBuf::from("src/list.c"))
    }

    #[test]
    fn test_format_levels() {
        let formatter = GithubFormatter::new();
        let error = formatter.format_diagnostic(&make_diagnostic(Severity::Error, "tab", 9, "Tab"));
        assert!(error.starts_with("::error"));
        assert!(error.contains("file=src/list.c"));
        assert!(error.contains("line=10"));
        assert!(error.contains("col=5"));
        assert!(error.contains("title=tab"));

        let warning = formatter.format_diagnostic(&make_diagnostic(Severity::Warning, "tab", 0, "Tab"));
        assert!(warning.starts_with("::warning"));

        let info = formatter.format_diagnostic(&make_diagnostic(Severity::Info, "tab", 0, "Tab"));
        assert!(info.starts_with("::notice"));
    }

    #[test]
    fn test_escape_newlines() {
        let output = GithubFormatter::new()
            .format_diagnostic(&make_diagnostic(Severity::Error, "tab", 1, "Line1\nLine2 100%"));
        assert!(output.contains("%0A"));
        assert!(output.contains("100%25"));
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_result() {
        let result = LintResult {
            diagnostics: vec![
                make_diagnostic(Severity::Error, "tab", 1, "Error"),
                make_diagnostic(Severity::Info, "line-length", 2, "Long"),
            ],
            files_processed: 1,
            error_count: 1,
            info_count: 1,
            ..Default::default()
        };

        let output = GithubFormatter::new().format(&result);
        assert!(output.contains("::error"));
        assert!(output.contains("::notice file="));
        assert!(output.contains("::notice::lint40: 1 error(s)"));
        assert!(!GithubFormatter::new().without_summary().format(&result).contains("::notice::"));
    }
}

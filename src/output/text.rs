//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use crate::rule::find_rule;
use colored::*;
use std::collections::BTreeMap;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show source context
    pub show_source: bool,

    /// Show help text
    pub show_help: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_source: true,
            show_help: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint(&self, text: String, style: fn(ColoredString) -> ColoredString) -> String {
        if self.colored {
            style(text.normal()).to_string()
        } else {
            text
        }
    }

    fn severity_str(&self, severity: Severity) -> String {
        let s = severity.to_string();
        match severity {
            Severity::Error => self.paint(s, |s| s.red().bold()),
            Severity::Warning => self.paint(s, |s| s.yellow().bold()),
            Severity::Info => self.paint(s, |s| s.blue()),
        }
    }

    fn gutter(&self, mark: &str) -> String {
        self.paint(mark.to_string(), |s| s.blue())
    }

    fn count(&self, n: usize, singular: &str, plural: &str) -> String {
        format!("{} {}", n, if n == 1 { singular } else { plural })
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        let mut by_file: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for diag in &result.diagnostics {
            by_file.entry(diag.file.clone()).or_default().push(diag);
        }

        for (file, diagnostics) in &by_file {
            output.push_str(&self.paint(file.display().to_string(), |s| s.underline()));
            output.push('\n');

            for diag in diagnostics {
                output.push_str(&self.format_diagnostic(diag));
                output.push('\n');
            }
        }

        if self.show_stats {
            output.push_str(&format!(
                "\n{} processed",
                self.count(result.files_processed, "file", "files")
            ));

            let mut counts = Vec::new();
            if result.error_count > 0 {
                counts.push(self.paint(self.count(result.error_count, "error", "errors"), |s| s.red()));
            }
            if result.warning_count > 0 {
                counts.push(self.paint(
                    self.count(result.warning_count, "warning", "warnings"),
                    |s| s.yellow(),
                ));
            }
            if result.info_count > 0 {
                counts.push(self.paint(self.count(result.info_count, "info", "infos"), |s| s.blue()));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}:{}:{}: {}[{}]: {}\n",
            diag.file.display(),
            diag.line(),
            diag.column(),
            self.severity_str(diag.severity),
            self.paint(diag.code.clone(), |s| s.cyan()),
            diag.message
        ));

        if self.show_source {
            if let Some(source) = &diag.source_line {
                output.push_str(&format!("     {}\n", self.gutter("|")));
                output.push_str(&format!(
                    "{} {} {}\n",
                    self.paint(format!("{:>4}", diag.line()), |s| s.blue()),
                    self.gutter("|"),
                    source
                ));

                let padding = " ".repeat(diag.range.start.character);
                let underline = "^".repeat(diag.range.len().max(1));
                output.push_str(&format!(
                    "     {} {}{}\n",
                    self.gutter("|"),
                    padding,
                    self.paint(underline, |s| s.red())
                ));
            }
        }

        if self.show_help {
            let help = diag
                .help
                .as_deref()
                .or_else(|| find_rule(&diag.code).map(|rule| rule.description));
            if let Some(help) = help {
                output.push_str(&format!("     {} help: {}\n", self.gutter("="), help));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Range;
    use std::path::PathBuf;

    #[test]
    fn test_format_diagnostic() {
        let formatter = TextFormatter::new().without_color();
        let diag = Diagnostic::new(
            "pointer-style",
            "Pointer asterisk should be next to the variable name",
            Range::on_line(9, 4, 8),
        )
        .with_file(PathBuf::from("test.c"))
        .with_source_line("    int* p;");

        let output = formatter.format_diagnostic(&diag);
        assert!(output.contains("test.c:10:5"));
        assert!(output.contains("info[pointer-style]"));
        assert!(output.contains("  10 |     int* p;"));
        assert!(output.contains("|     ^^^^\n"));
        assert!(output.contains("help:"));
    }

    #[test]
    fn test_explicit_help_wins() {
        let formatter = TextFormatter::new().without_color();
        let diag = Diagnostic::new("tab", "Tab", Range::default()).with_help("Use spaces");
        assert!(formatter.format_diagnostic(&diag).contains("help: Use spaces"));
    }

    #[test]
    fn test_format_result() {
        let formatter = TextFormatter::new().without_color();
        let result = LintResult {
            diagnostics: vec![Diagnostic::new("tab", "Tab", Range::default())
                .with_severity(Severity::Warning)
                .with_file(PathBuf::from("test.c"))],
            files_processed: 1,
            warning_count: 1,
            ..Default::default()
        };

        let output = formatter.format(&result);
        assert!(output.starts_with("test.c\n"));
        assert!(output.contains("1 file processed"));
        assert!(output.contains("1 warning"));
    }
}

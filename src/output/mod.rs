//! Output formatters for lint results

mod compact;
mod github;
mod json;
mod lsp;
mod text;

pub use compact::CompactFormatter;
pub use github::GithubFormatter;
pub use json::JsonFormatter;
pub use lsp::{to_lsp_diagnostics, LspDiagnostic, LspFormatter, LspSeverity, PublishDiagnosticsParams};
pub use text::TextFormatter;

use crate::config::OutputFormat;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire lint result
    fn format(&self, result: &LintResult) -> String;

    /// Format a single diagnostic
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Formatter for a configured output format
pub fn formatter_for(format: OutputFormat, colored: bool, statistics: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            formatter.colored = colored;
            formatter.show_stats = statistics;
            Box::new(formatter)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
        OutputFormat::Github => Box::new(GithubFormatter::new()),
        OutputFormat::Lsp => Box::new(LspFormatter::new()),
    }
}

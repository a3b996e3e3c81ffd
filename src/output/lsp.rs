//! Language Server Protocol diagnostics
//!
//! Renders results as `textDocument/publishDiagnostics` notifications, one
//! per file, so editors and LSP clients can consume them directly.

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use crate::position::{utf16_column, Position, Range};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// LSP diagnostic severity values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LspSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl From<Severity> for LspSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => LspSeverity::Error,
            Severity::Warning => LspSeverity::Warning,
            Severity::Info => LspSeverity::Information,
        }
    }
}

/// LSP diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LspDiagnostic {
    pub range: Range,
    pub severity: Option<u32>,
    pub code: Option<String>,
    pub source: Option<String>,
    pub message: String,
}

/// Params of a `textDocument/publishDiagnostics` notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishDiagnosticsParams {
    pub uri: String,
    pub diagnostics: Vec<LspDiagnostic>,
}

#[derive(Serialize)]
struct Notification<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: PublishDiagnosticsParams,
}

/// Convert diagnostics to LSP diagnostics
///
/// LSP columns count UTF-16 code units. `text` is the document the
/// diagnostics belong to; without it only the line each diagnostic carries
/// is available for the conversion.
pub fn to_lsp_diagnostics(diagnostics: &[Diagnostic], text: Option<&str>) -> Vec<LspDiagnostic> {
    convert(diagnostics, text)
}

fn convert<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>, text: Option<&str>) -> Vec<LspDiagnostic> {
    let lines: Vec<&str> = text.map(|t| t.lines().collect()).unwrap_or_default();
    diagnostics
        .into_iter()
        .map(|d| to_lsp_diagnostic(d, &lines))
        .collect()
}

fn to_lsp_diagnostic(d: &Diagnostic, lines: &[&str]) -> LspDiagnostic {
    LspDiagnostic {
        range: utf16_range(d, lines),
        severity: Some(LspSeverity::from(d.severity) as u32),
        code: Some(d.code.clone()),
        source: Some(d.source.clone()),
        message: d.message.clone(),
    }
}

fn utf16_range(d: &Diagnostic, lines: &[&str]) -> Range {
    let line_text = |row: usize| match lines.get(row) {
        Some(line) => Some(*line),
        None if row == d.range.start.line => d.source_line.as_deref(),
        None => None,
    };
    let position = |p: Position| match line_text(p.line) {
        Some(line) => Position::new(p.line, utf16_column(line, p.character)),
        None => p,
    };
    Range::new(position(d.range.start), position(d.range.end))
}

/// `file://` URI for a path
pub fn path_to_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    format!("file://{}", absolute.display())
}

/// Formatter emitting one publishDiagnostics notification per line
#[derive(Default)]
pub struct LspFormatter;

impl LspFormatter {
    pub fn new() -> Self {
        Self
    }

    fn notification(&self, params: PublishDiagnosticsParams) -> String {
        let notification = Notification {
            jsonrpc: "2.0",
            method: "textDocument/publishDiagnostics",
            params,
        };
        serde_json::to_string(&notification).unwrap_or_else(|e| {
            log::error!("Failed to serialize notification: {}", e);
            String::new()
        })
    }
}

impl OutputFormatter for LspFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut by_file: BTreeMap<&Path, Vec<&Diagnostic>> = BTreeMap::new();
        for diag in &result.diagnostics {
            by_file.entry(diag.file.as_path()).or_default().push(diag);
        }

        let mut output = String::new();
        for (file, diagnostics) in by_file {
            let text = match std::fs::read_to_string(file) {
                Ok(text) => Some(text),
                Err(e) => {
                    log::debug!("No text for {}: {}", file.display(), e);
                    None
                }
            };
            output.push_str(&self.notification(PublishDiagnosticsParams {
                uri: path_to_uri(file),
                diagnostics: convert(diagnostics, text.as_deref()),
            }));
            output.push('\n');
        }
        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        serde_json::to_string(&to_lsp_diagnostic(diagnostic, &[])).unwrap_or_default()
    }
}

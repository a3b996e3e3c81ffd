//! Diagnostic types for lint results

use crate::position::Range;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Value reported in the `source` field of every diagnostic
pub const SOURCE: &str = "lint40";

/// Severity level for diagnostics
///
/// Style findings are informational; configuration can raise individual
/// codes to warnings or errors for CI use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    #[default]
    Info,
    /// Warning - potential issue
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// A single style finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code, e.g. `operator-spacing`
    pub code: String,

    pub severity: Severity,

    pub message: String,

    /// Always [`SOURCE`]
    pub source: String,

    /// Zero-based span in the document
    pub range: Range,

    /// File the diagnostic belongs to; empty for in-memory documents
    #[serde(default, skip_serializing_if = "is_empty_path")]
    pub file: PathBuf,

    /// Text of the first line of the range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

fn is_empty_path(path: &PathBuf) -> bool {
    path.as_os_str().is_empty()
}

impl Diagnostic {
    pub fn new(code: &str, message: impl Into<String>, range: Range) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Info,
            message: message.into(),
            source: SOURCE.to_string(),
            range,
            file: PathBuf::new(),
            source_line: None,
            help: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = file;
        self
    }

    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// One-based line for display
    pub fn line(&self) -> usize {
        self.range.start.line + 1
    }

    /// One-based column for display
    pub fn column(&self) -> usize {
        self.range.start.character + 1
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_severity_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("hint".parse::<Severity>(), Ok(Severity::Info));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::new("tab", "Your code must not contain tab characters.", Range::on_line(2, 0, 1));
        assert_eq!(diag.severity, Severity::Info);
        assert_eq!(diag.source, "lint40");
        assert_eq!(diag.line(), 3);
        assert_eq!(diag.column(), 1);
        assert!(!diag.is_error());
    }

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::new("line-length", "too long", Range::on_line(0, 80, 90))
            .with_severity(Severity::Error)
            .with_file(PathBuf::from("main.c"))
            .with_source_line("int x;")
            .with_help("split the line");
        assert!(diag.is_error());
        assert_eq!(diag.file, PathBuf::from("main.c"));
        assert_eq!(diag.source_line.as_deref(), Some("int x;"));
        assert_eq!(diag.help.as_deref(), Some("split the line"));
    }

    #[test]
    fn test_serialize_skips_empty_file() {
        let diag = Diagnostic::new("tab", "msg", Range::on_line(0, 0, 1));
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("\"file\""));
        assert!(json.contains("\"source\":\"lint40\""));
    }
}

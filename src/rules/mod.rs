//! Style checks
//!
//! [`structural`] checks walk the syntax tree; [`lexical`] checks scan the
//! text line by line. Both push into a caller-owned diagnostic list and
//! consult the same [`CheckContext`].

pub mod lexical;
pub mod structural;

use crate::config::StyleConfig;
use crate::diagnostic::Diagnostic;
use crate::position::{LineIndex, Range};
use crate::rule::RuleSelection;

/// Shared inputs for one lint pass over one document
pub struct CheckContext<'a> {
    pub text: &'a str,
    pub index: &'a LineIndex,
    pub rules: &'a RuleSelection,
    pub style: &'a StyleConfig,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        text: &'a str,
        index: &'a LineIndex,
        rules: &'a RuleSelection,
        style: &'a StyleConfig,
    ) -> Self {
        Self {
            text,
            index,
            rules,
            style,
        }
    }

    /// Text of `row` without its line terminator
    pub fn line(&self, row: usize) -> Option<&'a str> {
        let start = self.index.line_start(row)?;
        let end = self
            .index
            .line_start(row + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        self.text
            .get(start..end)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// Range of the byte span `start..end`
    pub fn range(&self, start: usize, end: usize) -> Range {
        self.index.range_of(start, end)
    }

    /// Build a diagnostic and attach the text of its first line
    pub fn diagnostic(&self, code: &str, message: impl Into<String>, range: Range) -> Diagnostic {
        let diagnostic = Diagnostic::new(code, message, range);
        match self.line(range.start.line) {
            Some(line) => diagnostic.with_source_line(line),
            None => diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mode::Mode;

    #[test]
    fn test_line_lookup_strips_terminators() {
        let text = "int a;\r\nint b;\nint c;";
        let index = LineIndex::new(text);
        let rules = RuleSelection::new(Mode::Draft, &Config::default());
        let style = StyleConfig::default();
        let ctx = CheckContext::new(text, &index, &rules, &style);
        assert_eq!(ctx.line(0), Some("int a;"));
        assert_eq!(ctx.line(1), Some("int b;"));
        assert_eq!(ctx.line(2), Some("int c;"));
        assert_eq!(ctx.line(3), None);
    }

    #[test]
    fn test_diagnostic_carries_source_line() {
        let text = "int a;\nint b;\n";
        let index = LineIndex::new(text);
        let rules = RuleSelection::new(Mode::Draft, &Config::default());
        let style = StyleConfig::default();
        let ctx = CheckContext::new(text, &index, &rules, &style);
        let diag = ctx.diagnostic("tab", "msg", ctx.range(7, 10));
        assert_eq!(diag.source_line.as_deref(), Some("int b;"));
        assert_eq!(diag.range, Range::on_line(1, 0, 3));
    }
}

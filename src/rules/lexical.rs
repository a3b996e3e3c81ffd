//! Line-oriented checks
//!
//! Each physical line is checked twice: once as written (length, tabs,
//! comment markers, trailing whitespace) and once with comments removed
//! (pointer style, spacing). The stripped copy keeps a column map back to
//! the written line so every range points into the source.

use super::CheckContext;
use crate::diagnostic::Diagnostic;
use crate::position::Range;
use crate::rule::codes;

pattern!(LINE_COMMENT, r"//.*$");
pattern!(BLOCK_COMMENT, r"/\*.*?\*/");
pattern!(CONTINUATION_COMMENT, r"^\s*\*(?:[\s/].*)?$");
pattern!(POINTER_STYLE, r"\b(int|char|float|double|FILE|void|size_t)\*");
pattern!(FOR_HEADER, r"for\s*\(([^)]*)\)");
pattern!(KEYWORD_PAREN, r"\b(if|for|while)\(");
pattern!(PAREN_AFTER, r"\(\s+\S");
pattern!(PAREN_BEFORE, r"\S\s+\)");
pattern!(BOOLEAN_COMPARISON, r"(\w+)\s*(==|!=)\s*(true|false)\b");
pattern!(TRAILING_WHITESPACE, r"\s+$");
pattern!(STATEMENT_END, r"[;{})]\s*$");

/// Run every active line check over the document
pub fn check_lines(ctx: &CheckContext<'_>, out: &mut Vec<Diagnostic>) {
    let review = ctx.rules.mode().is_review();
    // true at the start of the file and after any line that ends a statement
    let mut statement_start = true;

    for row in 0..ctx.index.line_count() {
        let Some(raw) = ctx.line(row) else {
            break;
        };
        let raw_blank = raw.trim().is_empty();

        check_line_length(ctx, row, raw, out);
        check_tabs(ctx, row, raw, out);
        if review {
            check_comment_style(ctx, row, raw, out);
            if raw_blank {
                check_blank_line_spaces(ctx, row, raw, out);
            } else {
                check_trailing_whitespace(ctx, row, raw, out);
            }
        }

        let working = strip_comments(raw, review);
        let trimmed = working.text.trim();
        if trimmed.is_empty() {
            statement_start = true;
            continue;
        }

        if statement_start {
            check_indentation(ctx, row, raw, out);
        }
        check_pointer_style(ctx, row, &working, out);
        check_comma_spacing(ctx, row, &working, out);
        check_for_semicolons(ctx, row, &working, out);
        check_keyword_spacing(ctx, row, &working, out);
        check_paren_spacing(ctx, row, &working, out);
        if review {
            check_boolean_comparison(ctx, row, &working, out);
        }

        statement_start = STATEMENT_END.is_match(trimmed);
    }
}

/// A line with its comments removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrippedLine {
    pub text: String,
    /// Byte column in the written line of each byte of `text`
    columns: Vec<usize>,
}

impl StrippedLine {
    /// Column in the written line of byte `i` of the stripped text
    pub fn raw_column(&self, i: usize) -> usize {
        match self.columns.get(i) {
            Some(column) => *column,
            None => self.columns.last().map_or(0, |last| last + 1),
        }
    }

    /// Written-line columns of the stripped span `start..end`
    pub fn raw_span(&self, start: usize, end: usize) -> (usize, usize) {
        let from = self.raw_column(start);
        if end > start {
            (from, self.raw_column(end - 1) + 1)
        } else {
            (from, from)
        }
    }
}

/// Remove `//` and single-line `/* */` comments
///
/// With `continuation` set, lines made only of a `* ...` comment
/// continuation are removed entirely.
pub fn strip_comments(line: &str, continuation: bool) -> StrippedLine {
    if continuation && CONTINUATION_COMMENT.is_match(line) {
        return StrippedLine::default();
    }
    let code = LINE_COMMENT.find(line).map_or(line, |m| &line[..m.start()]);

    let mut text = String::with_capacity(code.len());
    let mut columns = Vec::with_capacity(code.len());
    let mut keep = |from: usize, to: usize| {
        text.push_str(&code[from..to]);
        columns.extend(from..to);
    };
    let mut last = 0;
    for m in BLOCK_COMMENT.find_iter(code) {
        keep(last, m.start());
        last = m.end();
    }
    keep(last, code.len());

    StrippedLine { text, columns }
}

fn push(ctx: &CheckContext<'_>, out: &mut Vec<Diagnostic>, code: &str, message: String, row: usize, start: usize, end: usize) {
    out.push(ctx.diagnostic(code, message, Range::on_line(row, start, end)));
}

/// Push a diagnostic whose span was found in the stripped line
fn push_stripped(
    ctx: &CheckContext<'_>,
    out: &mut Vec<Diagnostic>,
    code: &str,
    message: String,
    row: usize,
    line: &StrippedLine,
    start: usize,
    end: usize,
) {
    let (start, end) = line.raw_span(start, end);
    push(ctx, out, code, message, row, start, end);
}

fn check_indentation(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::INDENT_LENGTH) {
        return;
    }
    let width = ctx.style.indent_width;
    let leading = raw.len() - raw.trim_start_matches(' ').len();
    if leading % width != 0 {
        push(ctx, out, codes::INDENT_LENGTH, indentation_message(width), row, 0, leading);
    }
}

fn indentation_message(width: usize) -> String {
    if width == 8 {
        "Each level of indentation must be eight (8) characters".to_string()
    } else {
        format!("Each level of indentation must be {} characters", width)
    }
}

fn check_line_length(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::LINE_LENGTH) {
        return;
    }
    let max = ctx.style.max_line_length;
    let length = raw.chars().count();
    if length <= max {
        return;
    }
    let start = raw.char_indices().nth(max).map(|(i, _)| i).unwrap_or(raw.len());
    push(
        ctx,
        out,
        codes::LINE_LENGTH,
        format!("Line exceeds {} characters ({} chars)", max, length),
        row,
        start,
        raw.len(),
    );
}

fn check_tabs(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::TAB) {
        return;
    }
    for (i, _) in raw.match_indices('\t') {
        push(ctx, out, codes::TAB, "Your code must not contain tab characters.".to_string(), row, i, i + 1);
    }
}

fn check_comment_style(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::COMMENT_STYLE) {
        return;
    }
    for (i, _) in raw.match_indices("//") {
        push(
            ctx,
            out,
            codes::COMMENT_STYLE,
            "Replace // with /* */ comments. Check for commented-out code.".to_string(),
            row,
            i,
            i + 2,
        );
    }
}

fn check_trailing_whitespace(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::TRAILING_WHITESPACE) {
        return;
    }
    if let Some(m) = TRAILING_WHITESPACE.find(raw) {
        push(ctx, out, codes::TRAILING_WHITESPACE, "Remove trailing whitespace".to_string(), row, m.start(), m.end());
    }
}

fn check_blank_line_spaces(ctx: &CheckContext<'_>, row: usize, raw: &str, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::BLANK_LINE_SPACES) || raw.is_empty() {
        return;
    }
    push(
        ctx,
        out,
        codes::BLANK_LINE_SPACES,
        "Blank lines must not contain whitespace".to_string(),
        row,
        0,
        raw.len(),
    );
}

fn check_pointer_style(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::POINTER_STYLE) {
        return;
    }
    for m in POINTER_STYLE.find_iter(&line.text) {
        push_stripped(
            ctx,
            out,
            codes::POINTER_STYLE,
            "Declare pointers the Linux way: place the asterisk with the variable, not the type.".to_string(),
            row,
            line,
            m.start(),
            m.end(),
        );
    }
}

fn check_comma_spacing(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::COMMA_SPACING) {
        return;
    }
    let text = line.text.as_str();
    for (i, _) in text.match_indices(',') {
        match text[i + 1..].chars().next() {
            None => {}
            Some(next) if next.is_whitespace() => {}
            Some(_) => push_stripped(
                ctx,
                out,
                codes::COMMA_SPACING,
                "Put a space after every comma.".to_string(),
                row,
                line,
                i,
                i + 1,
            ),
        }
    }
}

fn check_for_semicolons(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::FOR_SEMICOLON_SPACING) {
        return;
    }
    for caps in FOR_HEADER.captures_iter(&line.text) {
        let Some(header) = caps.get(1) else {
            continue;
        };
        let bytes = header.as_str().as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if *b != b';' {
                continue;
            }
            if matches!(bytes.get(i + 1), Some(next) if *next != b' ' && *next != b')') {
                let at = header.start() + i;
                push_stripped(
                    ctx,
                    out,
                    codes::FOR_SEMICOLON_SPACING,
                    "Put a space after semicolons in 'for' loop headers.".to_string(),
                    row,
                    line,
                    at,
                    at + 1,
                );
            }
        }
    }
}

fn check_keyword_spacing(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::KEYWORD_SPACING) {
        return;
    }
    for caps in KEYWORD_PAREN.captures_iter(&line.text) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_stripped(
            ctx,
            out,
            codes::KEYWORD_SPACING,
            format!("Put a space between '{}' and '('.", keyword.as_str()),
            row,
            line,
            whole.start(),
            whole.end(),
        );
    }
}

fn check_paren_spacing(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if ctx.rules.is_active(codes::PAREN_SPACING_AFTER) {
        for m in PAREN_AFTER.find_iter(&line.text) {
            push_stripped(
                ctx,
                out,
                codes::PAREN_SPACING_AFTER,
                "Remove space immediately after (".to_string(),
                row,
                line,
                m.start(),
                m.end(),
            );
        }
    }
    if ctx.rules.is_active(codes::PAREN_SPACING_BEFORE) {
        for m in PAREN_BEFORE.find_iter(&line.text) {
            push_stripped(
                ctx,
                out,
                codes::PAREN_SPACING_BEFORE,
                "Remove space immediately before )".to_string(),
                row,
                line,
                m.start(),
                m.end(),
            );
        }
    }
}

fn check_boolean_comparison(ctx: &CheckContext<'_>, row: usize, line: &StrippedLine, out: &mut Vec<Diagnostic>) {
    if !ctx.rules.is_active(codes::BOOLEAN_COMPARISON) {
        return;
    }
    for caps in BOOLEAN_COMPARISON.captures_iter(&line.text) {
        let (Some(whole), Some(name), Some(op), Some(value)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let suggestion = simplified_comparison(name.as_str(), op.as_str(), value.as_str());
        push_stripped(
            ctx,
            out,
            codes::BOOLEAN_COMPARISON,
            format!(
                "Simplify boolean check: use '{}' instead of '{}'",
                suggestion,
                whole.as_str()
            ),
            row,
            line,
            whole.start(),
            whole.end(),
        );
    }
}

/// `x == false` and `x != true` become `!x`; the other two become `x`
pub fn simplified_comparison(name: &str, op: &str, value: &str) -> String {
    match (op, value) {
        ("==", "false") | ("!=", "true") => format!("!{}", name),
        _ => name.to_string(),
    }
}

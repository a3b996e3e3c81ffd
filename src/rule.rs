//! Rule catalog and per-pass rule selection

use crate::config::Config;
use crate::mode::Mode;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Diagnostic codes
pub mod codes {
    pub const OPERATOR_SPACING: &str = "operator-spacing";
    pub const FUNCTION_BRACE_STYLE: &str = "function-brace-style";
    pub const MANDATORY_BRACES: &str = "mandatory-braces";
    pub const CONTROL_BRACE_NEWLINE: &str = "control-brace-newline";
    pub const CONTROL_BRACE_SPACING: &str = "control-brace-spacing";
    pub const EXCESSIVE_NESTING: &str = "excessive-nesting";
    pub const DOCUMENTATION: &str = "documentation";
    pub const INDENT_LENGTH: &str = "indent-length";
    pub const LINE_LENGTH: &str = "line-length";
    pub const TAB: &str = "tab";
    pub const POINTER_STYLE: &str = "pointer-style";
    pub const COMMA_SPACING: &str = "comma-spacing";
    pub const FOR_SEMICOLON_SPACING: &str = "for-semicolon-spacing";
    pub const KEYWORD_SPACING: &str = "keyword-spacing";
    pub const PAREN_SPACING_AFTER: &str = "paren-spacing-after";
    pub const PAREN_SPACING_BEFORE: &str = "paren-spacing-before";
    pub const COMMENT_STYLE: &str = "comment-style";
    pub const BOOLEAN_COMPARISON: &str = "boolean-comparison";
    pub const TRAILING_WHITESPACE: &str = "trailing-whitespace";
    pub const BLANK_LINE_SPACES: &str = "blank-line-spaces";
    pub const FILE_READ_ERROR: &str = "file-read-error";
}

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Line length, indentation and tabs
    Layout,
    /// Whitespace around operators, commas and parentheses
    Spacing,
    /// Brace placement
    Braces,
    /// Headers, contracts and struct descriptions
    Documentation,
    /// Control flow depth
    Complexity,
    /// Comment syntax
    Comments,
    /// Expressions that can be written more simply
    Simplification,
    /// Problems reading input files
    Io,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Layout => write!(f, "layout"),
            RuleCategory::Spacing => write!(f, "spacing"),
            RuleCategory::Braces => write!(f, "braces"),
            RuleCategory::Documentation => write!(f, "documentation"),
            RuleCategory::Complexity => write!(f, "complexity"),
            RuleCategory::Comments => write!(f, "comments"),
            RuleCategory::Simplification => write!(f, "simplification"),
            RuleCategory::Io => write!(f, "io"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "layout" => Ok(RuleCategory::Layout),
            "spacing" => Ok(RuleCategory::Spacing),
            "braces" => Ok(RuleCategory::Braces),
            "documentation" | "docs" => Ok(RuleCategory::Documentation),
            "complexity" => Ok(RuleCategory::Complexity),
            "comments" => Ok(RuleCategory::Comments),
            "simplification" => Ok(RuleCategory::Simplification),
            "io" => Ok(RuleCategory::Io),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A built-in rule
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub code: &'static str,

    /// Short human-readable name
    pub name: &'static str,

    pub description: &'static str,

    pub category: RuleCategory,

    /// Lowest mode that runs the rule; `Off` marks rules that any active mode runs
    pub tier: Mode,

    /// Code that triggers the rule
    pub example_bad: &'static str,

    /// The same code written correctly
    pub example_good: &'static str,
}

impl Rule {
    /// Whether the rule runs in `mode`
    pub fn runs_in(&self, mode: Mode) -> bool {
        self.tier == Mode::Off || mode.includes(self.tier)
    }
}

macro_rules! rule {
    ($code:expr, $name:expr, $category:ident, $tier:ident, $desc:expr, $bad:expr, $good:expr) => {
        Rule {
            code: $code,
            name: $name,
            description: $desc,
            category: RuleCategory::$category,
            tier: Mode::$tier,
            example_bad: $bad,
            example_good: $good,
        }
    };
}

static CATALOG: &[Rule] = &[
    rule!(codes::OPERATOR_SPACING, "Operator spacing", Spacing, Draft,
        "Binary, assignment and ternary operators need a space on both sides.",
        "int x=5;", "int x = 5;"),
    rule!(codes::FUNCTION_BRACE_STYLE, "Function brace style", Braces, Draft,
        "A function's opening brace goes on its own line.",
        "int main(void) {", "int main(void)\n{"),
    rule!(codes::MANDATORY_BRACES, "Mandatory braces", Braces, Draft,
        "if, for, while and do bodies are always compound statements.",
        "if (done) return;", "if (done) {\n        return;\n}"),
    rule!(codes::CONTROL_BRACE_NEWLINE, "Control brace newline", Braces, Draft,
        "A control statement's opening brace goes on the same line as its keyword.",
        "while (n > 0)\n{", "while (n > 0) {"),
    rule!(codes::CONTROL_BRACE_SPACING, "Control brace spacing", Braces, Draft,
        "Put a space before a control statement's opening brace.",
        "if (ok){", "if (ok) {"),
    rule!(codes::EXCESSIVE_NESTING, "Excessive nesting", Complexity, Review,
        "Control statements nest at most three deep; extract a helper function instead.",
        "if (a) {\n if (b) {\n  if (c) {\n   if (d) {", "if (a && b)\n        handle(c, d);"),
    rule!(codes::DOCUMENTATION, "Documentation", Documentation, Review,
        "Files start with a header comment; functions are preceded by a contract ending in **/ and structs by a description ending in */.",
        "int area(int w, int h)\n{", "/******* area *******\n * ...\n ********************/\nint area(int w, int h)\n{"),
    rule!(codes::INDENT_LENGTH, "Indentation width", Layout, Draft,
        "Statements are indented in multiples of eight spaces.",
        "    return 0;", "        return 0;"),
    rule!(codes::LINE_LENGTH, "Line length", Layout, Draft,
        "Lines are at most 80 characters long.",
        "printf(\"a very long format string that keeps going past the right margin...\");",
        "printf(\"a shorter line\\n\");"),
    rule!(codes::TAB, "Tab characters", Layout, Draft,
        "Source files contain no tab characters; indent with spaces.",
        "\treturn 0;", "        return 0;"),
    rule!(codes::POINTER_STYLE, "Pointer declaration style", Spacing, Draft,
        "The asterisk of a pointer declaration binds to the variable, not the type.",
        "char* name;", "char *name;"),
    rule!(codes::COMMA_SPACING, "Comma spacing", Spacing, Draft,
        "Every comma is followed by a space.",
        "max(a,b);", "max(a, b);"),
    rule!(codes::FOR_SEMICOLON_SPACING, "For-loop semicolon spacing", Spacing, Draft,
        "Semicolons in a for-loop header are followed by a space.",
        "for (i = 0;i < n;i++)", "for (i = 0; i < n; i++)"),
    rule!(codes::KEYWORD_SPACING, "Keyword spacing", Spacing, Draft,
        "if, for and while are separated from their parenthesis by a space.",
        "if(x > 5)", "if (x > 5)"),
    rule!(codes::PAREN_SPACING_AFTER, "Space after parenthesis", Spacing, Draft,
        "No space directly after an opening parenthesis.",
        "f( x);", "f(x);"),
    rule!(codes::PAREN_SPACING_BEFORE, "Space before parenthesis", Spacing, Draft,
        "No space directly before a closing parenthesis.",
        "f(x );", "f(x);"),
    rule!(codes::COMMENT_STYLE, "Comment style", Comments, Review,
        "Use /* */ comments instead of //, and remove commented-out code.",
        "x++; // bump", "x++; /* bump */"),
    rule!(codes::BOOLEAN_COMPARISON, "Boolean comparison", Simplification, Review,
        "Test booleans directly instead of comparing them with true or false.",
        "if (done == false)", "if (!done)"),
    rule!(codes::TRAILING_WHITESPACE, "Trailing whitespace", Layout, Review,
        "Lines do not end in whitespace.",
        "return 0;  ", "return 0;"),
    rule!(codes::BLANK_LINE_SPACES, "Whitespace on blank line", Layout, Review,
        "Blank lines contain no spaces.",
        "        ", ""),
    rule!(codes::FILE_READ_ERROR, "File read error", Io, Off,
        "The file could not be read.",
        "", ""),
];

/// All built-in rules
pub fn builtin_rules() -> &'static [Rule] {
    CATALOG
}

/// Look up a rule by code
pub fn find_rule(code: &str) -> Option<&'static Rule> {
    CATALOG.iter().find(|rule| rule.code == code)
}

/// Codes that run in one lint pass
///
/// A rule runs when the mode includes its tier and the configuration
/// enables it.
#[derive(Debug, Clone)]
pub struct RuleSelection {
    mode: Mode,
    active: HashSet<&'static str>,
}

impl RuleSelection {
    pub fn new(mode: Mode, config: &Config) -> Self {
        let active = if mode.is_active() {
            CATALOG
                .iter()
                .filter(|rule| rule.runs_in(mode) && config.is_rule_enabled(rule.code))
                .map(|rule| rule.code)
                .collect()
        } else {
            HashSet::new()
        };
        Self { mode, active }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self, code: &str) -> bool {
        self.active.contains(code)
    }

    /// Whether any of `codes` is active
    pub fn any_active(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.is_active(code))
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

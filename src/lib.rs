//! lint40 - C style linter and documentation generator
//!
//! Checks C sources against a fixed house style and writes documentation
//! skeletons (file headers, function contracts, struct descriptions).
//!
//! # Architecture
//!
//! ```text
//! CLI/Session -> Engine -> syntax (tree-sitter) -> rules::{structural, lexical}
//!                       \-> template::{header, contract, structdoc} -> EditPlan
//! ```
//!
//! A lint pass parses the text once, runs the tree-driven checks and then a
//! single line scan, all gated by the current [`Mode`]:
//!
//! ```
//! use lint40::{Config, Engine, Mode};
//!
//! let engine = Engine::new(Config::default());
//! let diagnostics = engine.lint_source("int* p;\n", Mode::Draft);
//! assert_eq!(diagnostics[0].code, "pointer-style");
//! ```

/// Declare a lazily compiled regex static
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
            regex::Regex::new($re).expect(concat!("invalid pattern ", stringify!($name)))
        });
    };
}

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod edit;
pub mod engine;
pub mod files;
pub mod mode;
pub mod output;
pub mod position;
pub mod rule;
pub mod rules;
pub mod session;
pub mod syntax;
pub mod template;
pub mod watch;

// Re-export main types
pub use config::Config;
pub use diagnostic::{Diagnostic, Severity};
pub use document::SourceDocument;
pub use edit::{EditPlan, Insertion};
pub use engine::{Engine, LintResult};
pub use mode::Mode;
pub use position::{LineIndex, Position, Range};
pub use rule::{builtin_rules, find_rule, Rule, RuleCategory, RuleSelection};
pub use session::{DiagnosticCollection, DiagnosticSink, Session};
pub use template::{GenerationReport, TemplateKind};

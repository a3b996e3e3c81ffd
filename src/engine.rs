//! Core linter engine

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Severity};
use crate::document::SourceDocument;
use crate::mode::Mode;
use crate::position::{LineIndex, Range};
use crate::rule::{codes, RuleSelection};
use crate::rules::{lexical, structural, CheckContext};
use crate::syntax;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of linting operation
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// Files processed
    pub files_processed: usize,

    /// Files with errors
    pub files_with_errors: usize,

    /// Files with warnings
    pub files_with_warnings: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintResult {
    /// Result for one file from its diagnostics
    pub fn for_file(diagnostics: Vec<Diagnostic>) -> Self {
        let mut result = LintResult {
            files_processed: 1,
            ..LintResult::default()
        };
        for diag in &diagnostics {
            match diag.severity {
                Severity::Error => result.error_count += 1,
                Severity::Warning => result.warning_count += 1,
                Severity::Info => result.info_count += 1,
            }
        }
        if result.error_count > 0 {
            result.files_with_errors = 1;
        }
        if result.warning_count > 0 {
            result.files_with_warnings = 1;
        }
        result.diagnostics = diagnostics;
        result
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.files_processed += other.files_processed;
        self.files_with_errors += other.files_with_errors;
        self.files_with_warnings += other.files_with_warnings;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
    }
}

/// The main linter engine
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create a new engine with configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one lint pass over `text`
    ///
    /// The pass never fails. When the text cannot be parsed only the line
    /// checks run. Diagnostics come out grouped by check, in the order the
    /// checks run, with duplicates removed.
    pub fn lint_source(&self, text: &str, mode: Mode) -> Vec<Diagnostic> {
        let rules = RuleSelection::new(mode, &self.config);
        if rules.is_empty() {
            return Vec::new();
        }

        let index = LineIndex::new(text);
        let ctx = CheckContext::new(text, &index, &rules, &self.config.style);
        let mut diagnostics = Vec::new();

        match syntax::parse(text) {
            Ok(tree) => {
                if mode.is_review() {
                    structural::check_file_header(&ctx, &mut diagnostics);
                    structural::check_documentation(&ctx, &tree, &mut diagnostics);
                    structural::check_nesting(&ctx, &tree, &mut diagnostics);
                }
                structural::check_operator_spacing(&ctx, &tree, &mut diagnostics);
                structural::check_braces(&ctx, &tree, &mut diagnostics);
            }
            Err(e) => {
                log::warn!("Parse failed, running line checks only: {}", e);
                if mode.is_review() {
                    structural::check_file_header(&ctx, &mut diagnostics);
                }
            }
        }
        lexical::check_lines(&ctx, &mut diagnostics);

        let mut diagnostics = dedupe(diagnostics);
        for diag in &mut diagnostics {
            if let Some(severity) = self.config.get_severity_override(&diag.code) {
                diag.severity = severity;
            }
        }

        log::debug!("{} pass produced {} diagnostic(s)", mode, diagnostics.len());
        diagnostics
    }

    /// Lint a document, honoring per-file rule ignores
    pub fn lint_document(&self, document: &SourceDocument, mode: Mode) -> Vec<Diagnostic> {
        let path = document.path();
        self.lint_source(document.text(), mode)
            .into_iter()
            .filter(|diag| !self.config.should_ignore_rule_for_file(&diag.code, path))
            .map(|diag| diag.with_file(path.to_path_buf()))
            .collect()
    }

    /// Lint multiple files
    pub fn lint(&self, files: &[PathBuf], mode: Mode) -> LintResult {
        let start = Instant::now();

        let results: Vec<LintResult> = if self.config.engine.parallel && files.len() > 1 {
            let threads = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => {
                    pool.install(|| files.par_iter().map(|f| self.lint_file(f, mode)).collect())
                }
                Err(e) => {
                    log::warn!("Thread pool unavailable, linting sequentially: {}", e);
                    files.iter().map(|f| self.lint_file(f, mode)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.lint_file(f, mode)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        combined
    }

    /// Lint a single file
    pub fn lint_file(&self, path: &Path, mode: Mode) -> LintResult {
        match SourceDocument::from_path(path) {
            Ok(document) => LintResult::for_file(self.lint_document(&document, mode)),
            Err(e) => {
                log::warn!("{}", e);
                let diagnostics = if mode.is_active() {
                    vec![Diagnostic::new(
                        codes::FILE_READ_ERROR,
                        format!("Failed to read file: {}", e),
                        Range::default(),
                    )
                    .with_severity(Severity::Error)
                    .with_file(path.to_path_buf())]
                } else {
                    Vec::new()
                };
                LintResult::for_file(diagnostics)
            }
        }
    }
}

/// Drop repeated (code, range, message) triples, keeping the first
fn dedupe(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|diag| seen.insert((diag.code.clone(), diag.range, diag.message.clone())))
        .collect()
}

//! Editing session: mode, open documents and where their diagnostics go
//!
//! A [`Session`] owns everything that outlives a single lint pass. Mode
//! changes fan out to every open document: switching to [`Mode::Off`]
//! empties the sink, switching to an active mode re-lints all C documents.

use crate::diagnostic::Diagnostic;
use crate::document::SourceDocument;
use crate::engine::Engine;
use crate::mode::Mode;
use std::collections::{BTreeMap, HashMap};

/// Receiver of per-document diagnostic sets
pub trait DiagnosticSink {
    /// Replace the whole set for `uri`
    fn replace(&mut self, uri: &str, diagnostics: Vec<Diagnostic>);

    /// Drop the sets of every document
    fn clear_all(&mut self);
}

/// In-memory sink keyed by document URI
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    sets: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &str) -> &[Diagnostic] {
        self.sets.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of documents with a non-empty set
    pub fn len(&self) -> usize {
        self.sets.values().filter(|set| !set.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Diagnostics across all documents
    pub fn total(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn replace(&mut self, uri: &str, diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            self.sets.remove(uri);
        } else {
            self.sets.insert(uri.to_string(), diagnostics);
        }
    }

    fn clear_all(&mut self) {
        self.sets.clear();
    }
}

pub struct Session<S: DiagnosticSink = DiagnosticCollection> {
    engine: Engine,
    mode: Mode,
    documents: BTreeMap<String, SourceDocument>,
    sink: S,
}

impl Session<DiagnosticCollection> {
    /// Session starting in the configured mode
    pub fn new(engine: Engine) -> Self {
        Self::with_sink(engine, DiagnosticCollection::new())
    }
}

impl<S: DiagnosticSink> Session<S> {
    pub fn with_sink(engine: Engine, sink: S) -> Self {
        let mode = engine.config().mode;
        Self {
            engine,
            mode,
            documents: BTreeMap::new(),
            sink,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status_label(&self) -> String {
        self.mode.status_label()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn document(&self, uri: &str) -> Option<&SourceDocument> {
        self.documents.get(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &SourceDocument> {
        self.documents.values()
    }

    /// Track a document and lint it
    pub fn open(&mut self, document: SourceDocument) {
        let uri = document.uri();
        self.documents.insert(uri.clone(), document);
        self.lint(&uri);
    }

    /// Replace a document's text and lint it again
    pub fn change(&mut self, uri: &str, text: impl Into<String>) {
        match self.documents.get_mut(uri) {
            Some(document) => document.set_text(text),
            None => {
                self.documents
                    .insert(uri.to_string(), SourceDocument::new(uri, text));
            }
        }
        self.lint(uri);
    }

    /// Stop tracking a document and drop its diagnostics
    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
        self.sink.replace(uri, Vec::new());
    }

    /// Lint one open document and publish its set
    ///
    /// Non-C documents and the Off mode are skipped.
    pub fn lint(&mut self, uri: &str) {
        if !self.mode.is_active() {
            return;
        }
        let Some(document) = self.documents.get(uri) else {
            return;
        };
        if !document.is_c_source() {
            log::trace!("Skipping non-C document {}", uri);
            return;
        }
        let diagnostics = self.engine.lint_document(document, self.mode);
        self.sink.replace(uri, diagnostics);
    }

    pub fn lint_all(&mut self) {
        let uris: Vec<String> = self.documents.keys().cloned().collect();
        for uri in uris {
            self.lint(&uri);
        }
    }

    /// Advance Draft -> Review -> Off -> Draft
    pub fn toggle(&mut self) -> Mode {
        self.set_mode(self.mode.next());
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let previous = self.mode;
        self.mode = mode;
        if previous != mode {
            log::info!("Mode changed from {} to {}", previous, mode);
        }

        if mode.is_active() {
            self.lint_all();
        } else {
            self.sink.clear_all();
        }
    }
}

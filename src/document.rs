//! Source documents

use crate::edit::EditPlan;
use crate::position::LineIndex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions treated as C sources
pub const C_EXTENSIONS: &[&str] = &["c", "h"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Text of one file plus its line index
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
    index: LineIndex,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self {
            path: path.into(),
            text,
            index,
        }
    }

    /// Document with no backing file
    pub fn untitled(text: impl Into<String>) -> Self {
        Self::new(PathBuf::new(), text)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    pub fn save(&self) -> Result<(), DocumentError> {
        std::fs::write(&self.path, &self.text).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier used by sessions and diagnostic sinks
    pub fn uri(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Text of `row` without its line terminator
    pub fn line(&self, row: usize) -> Option<&str> {
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

    /// Base name of the file, if any
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn is_c_source(&self) -> bool {
        is_c_path(&self.path)
    }

    /// Replace the text and rebuild the line index
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.index = LineIndex::new(&self.text);
    }

    /// Apply all insertions of `plan` as one edit
    pub fn apply(&mut self, plan: &EditPlan) {
        if plan.is_empty() {
            return;
        }
        let updated = plan.apply_to(&self.text);
        self.set_text(updated);
    }
}

/// Whether `path` has a C source or header extension
pub fn is_c_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| C_EXTENSIONS.contains(&ext))
}

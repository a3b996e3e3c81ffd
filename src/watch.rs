//! File watcher for continuous linting
//!
//! Watches C sources for changes and reports the changed files after a
//! short debounce so an editor's save burst triggers one re-lint.

use crate::document::C_EXTENSIONS;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use thiserror::Error;

/// Quiet period before a burst of events is reported
pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("file watcher failed: {0}")]
    Notify(#[from] notify::Error),

    #[error("cannot watch {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file watcher stopped")]
    Disconnected,
}

/// Kind of watch event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// File was created or modified
    Modified,
    /// File no longer exists
    Deleted,
}

/// One changed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

/// File watcher for continuous linting
pub struct Watcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    receiver: Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl Watcher {
    /// Watch C sources under `paths`
    pub fn new(paths: &[PathBuf]) -> Result<Self, WatchError> {
        Self::with_extensions(paths, C_EXTENSIONS)
    }

    /// Watch files with the given extensions under `paths`
    pub fn with_extensions(paths: &[PathBuf], extensions: &[&str]) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

        let mut watched = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.canonicalize().map_err(|source| WatchError::Io {
                path: path.clone(),
                source,
            })?;
            let watch_path = if path.is_file() {
                path.parent().unwrap_or(Path::new("."))
            } else {
                path.as_path()
            };
            debouncer
                .watcher()
                .watch(watch_path, RecursiveMode::Recursive)?;
            log::debug!("Watching {}", watch_path.display());
            watched.push(path);
        }

        Ok(Self {
            _debouncer: debouncer,
            receiver: rx,
            paths: watched,
            extensions: extensions.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// Block until watched files change
    ///
    /// Returns `Ok(None)` when the batch held no relevant file or the
    /// watcher reported a transient error.
    pub fn wait(&self) -> Result<Option<Vec<WatchEvent>>, WatchError> {
        match self.receiver.recv() {
            Ok(Ok(events)) => Ok(self.relevant(events)),
            Ok(Err(e)) => {
                log::warn!("Watch error: {}", e);
                Ok(None)
            }
            Err(_) => Err(WatchError::Disconnected),
        }
    }

    /// Non-blocking variant of [`Watcher::wait`]
    pub fn try_recv(&self) -> Option<Vec<WatchEvent>> {
        match self.receiver.try_recv() {
            Ok(Ok(events)) => self.relevant(events),
            _ => None,
        }
    }

    fn relevant(&self, events: Vec<DebouncedEvent>) -> Option<Vec<WatchEvent>> {
        let mut changed: Vec<WatchEvent> = Vec::new();
        for event in events {
            let path = event.path;
            if !self.matches_extension(&path) || !self.matches_watched_path(&path) {
                continue;
            }
            if changed.iter().any(|c| c.path == path) {
                continue;
            }
            let kind = if path.exists() {
                WatchEventKind::Modified
            } else {
                WatchEventKind::Deleted
            };
            changed.push(WatchEvent { path, kind });
        }

        if changed.is_empty() {
            None
        } else {
            Some(changed)
        }
    }

    fn matches_watched_path(&self, path: &Path) -> bool {
        self.paths.iter().any(|watched| {
            if watched.is_file() {
                path == watched
            } else {
                path.starts_with(watched)
            }
        })
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Clear the terminal
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watcher_creation() {
        let temp = TempDir::new().unwrap();
        let watcher = Watcher::new(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(watcher.watched_paths(), &[temp.path().canonicalize().unwrap()]);
        assert!(watcher.try_recv().is_none());
    }

    #[test]
    fn test_missing_path() {
        let err = Watcher::new(&[PathBuf::from("/nonexistent/src")]).err().unwrap();
        assert!(matches!(err, WatchError::Io { .. }));
    }

    #[test]
    fn test_extension_filter() {
        let temp = TempDir::new().unwrap();
        let watcher = Watcher::new(&[temp.path().to_path_buf()]).unwrap();

        assert!(watcher.matches_extension(Path::new("list.c")));
        assert!(watcher.matches_extension(Path::new("list.h")));
        assert!(watcher.matches_extension(Path::new("LIST.C")));
        assert!(!watcher.matches_extension(Path::new("list.o")));
        assert!(!watcher.matches_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_empty_extension_filter() {
        let temp = TempDir::new().unwrap();
        let watcher = Watcher::with_extensions(&[temp.path().to_path_buf()], &[]).unwrap();
        assert!(watcher.matches_extension(Path::new("notes.txt")));
    }

    #[test]
    fn test_path_matching() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("main.c");
        fs::write(&file, "int main(void);\n").unwrap();

        let watcher = Watcher::new(&[file.clone()]).unwrap();
        let canonical = file.canonicalize().unwrap();
        assert!(watcher.matches_watched_path(&canonical));
        assert!(!watcher.matches_watched_path(Path::new("/other/main.c")));
    }

    #[test]
    fn test_directory_matching() {
        let temp = TempDir::new().unwrap();
        let watcher = Watcher::new(&[temp.path().to_path_buf()]).unwrap();
        let nested = temp.path().canonicalize().unwrap().join("sub/list.c");
        assert!(watcher.matches_watched_path(&nested));
    }

    #[test]
    fn test_relevant_filters_and_dedupes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let source = root.join("a.c");
        fs::write(&source, "int a;\n").unwrap();
        let watcher = Watcher::new(&[root.clone()]).unwrap();

        let event = |path: PathBuf| DebouncedEvent {
            path,
            kind: notify_debouncer_mini::DebouncedEventKind::Any,
        };
        let changed = watcher
            .relevant(vec![
                event(source.clone()),
                event(source.clone()),
                event(root.join("a.o")),
                event(root.join("gone.h")),
            ])
            .unwrap();
        assert_eq!(
            changed,
            vec![
                WatchEvent {
                    path: source,
                    kind: WatchEventKind::Modified
                },
                WatchEvent {
                    path: root.join("gone.h"),
                    kind: WatchEventKind::Deleted
                },
            ]
        );
    }
}

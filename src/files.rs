//! Resolving command-line targets to C files

use crate::config::FilesConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilesError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid exclude pattern: {0}")]
    Exclude(#[from] globset::Error),
}

/// Expand files, directories and glob patterns into a sorted file list
///
/// Directories are searched with the configured include globs; anything
/// matching an exclude glob relative to the directory is dropped. Explicit
/// files are always kept.
pub fn collect_files(targets: &[String], config: &FilesConfig) -> Result<Vec<PathBuf>, FilesError> {
    let exclude = build_set(&config.exclude)?;
    let mut files = BTreeSet::new();

    for target in targets {
        let path = Path::new(target);
        if path.is_file() {
            files.insert(path.to_path_buf());
        } else if path.is_dir() {
            for pattern in &config.include {
                for file in expand(&path.join(pattern).to_string_lossy())? {
                    let relative = file.strip_prefix(path).unwrap_or(&file);
                    if exclude.is_match(relative) {
                        log::trace!("Excluded {}", file.display());
                        continue;
                    }
                    files.insert(file);
                }
            }
        } else {
            files.extend(expand(target)?);
        }
    }

    Ok(files.into_iter().collect())
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>, FilesError> {
    let paths = glob::glob(pattern).map_err(|source| FilesError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(paths.flatten().filter(|entry| entry.is_file()).collect())
}

fn build_set(patterns: &[String]) -> Result<GlobSet, FilesError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

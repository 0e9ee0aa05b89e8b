//! # Scanner Module
//!
//! Expands command-line path arguments into candidate files.
//!
//! A file argument is taken as-is. A directory argument contributes only
//! its direct children that are regular files, so a whole folder can be
//! passed without dragging in nested trees whose basenames would collide.
//!
//! A file reached through several spellings (`./dir` and `dir/IMG.jpg`,
//! a symlink and its target) is a candidate once, under the first spelling.
//!
//! ## Example
//! ```rust,ignore
//! use photo_filer::core::scanner::expand_paths;
//!
//! let result = expand_paths(&["/Users/me/DCIM".into(), "IMG_0042.jpg".into()]);
//! for error in &result.errors {
//!     eprintln!("warning: {}", error);
//! }
//! ```

use crate::error::ScanError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How far below a directory argument files are collected
pub const EXPANSION_DEPTH: usize = 1;

/// Result of expanding path arguments
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidate files, in argument order
    pub files: Vec<PathBuf>,
    /// Arguments or entries that were skipped (non-fatal)
    pub errors: Vec<ScanError>,
    /// Canonical paths already collected
    seen: HashSet<PathBuf>,
}

impl ScanResult {
    /// Keep `path` unless the same file was already collected
    fn push_file(&mut self, path: PathBuf) {
        let identity = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if self.seen.insert(identity) {
            self.files.push(path);
        } else {
            debug!(path = %path.display(), "same file already collected");
        }
    }
}

/// Expand files and directories into a flat list of regular files
pub fn expand_paths(paths: &[PathBuf]) -> ScanResult {
    let mut result = ScanResult::default();

    for path in paths {
        if path.is_file() {
            result.push_file(path.clone());
        } else if path.is_dir() {
            expand_directory(path, &mut result);
        } else {
            let error = if path.exists() {
                ScanError::NotARegularFile { path: path.clone() }
            } else {
                ScanError::NotFound { path: path.clone() }
            };
            warn!("{}", error);
            result.errors.push(error);
        }
    }

    debug!(
        candidates = result.files.len(),
        skipped = result.errors.len(),
        "expanded path arguments"
    );
    result
}

fn expand_directory(root: &Path, result: &mut ScanResult) {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(EXPANSION_DEPTH)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                result.push_file(entry.into_path());
            }
            Ok(entry) => {
                debug!(path = %entry.path().display(), "ignoring non-file entry");
            }
            Err(source) => {
                let path = source
                    .path()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| root.to_path_buf());
                let error = ScanError::ReadDirectory { path, source };
                warn!("{}", error);
                result.errors.push(error);
            }
        }
    }
}

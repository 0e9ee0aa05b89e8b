//! # Catalog Module
//!
//! Builds the set of photos to be filed: every candidate file that has a
//! readable capture time, tagged with a place label.
//!
//! ## Invariants
//! - Every `PhotoRecord` has both a capture time and a place label.
//! - A file without a capture time never becomes a record.
//! - Place lookup failures never drop a file; they yield the unknown label.

use crate::core::geocode::{PlaceLabeler, PlaceResolver};
use crate::core::metadata::MetadataResolver;
use crate::core::scanner::expand_paths;
use crate::error::PhotoFilerError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One successfully tagged photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub captured_at: NaiveDateTime,
    pub place: String,
}

impl PhotoRecord {
    pub fn new(path: impl Into<PathBuf>, captured_at: NaiveDateTime, place: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            captured_at,
            place: place.into(),
        }
    }

    /// File name without its directory
    pub fn basename(&self) -> String {
        basename(&self.path)
    }
}

/// File name component of a path, lossily converted
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// All photos of a run, keyed by source path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    records: BTreeMap<PathBuf, PhotoRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; a later record for the same path replaces the earlier one
    pub fn insert(&mut self, record: PhotoRecord) {
        self.records.insert(record.path.clone(), record);
    }

    pub fn get(&self, path: &Path) -> Option<&PhotoRecord> {
        self.records.get(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotoRecord> {
        self.records.values()
    }
}

impl FromIterator<PhotoRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = PhotoRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

/// Outcome of building a catalog
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    /// Inputs that were left out, in the order they were encountered
    pub skipped: Vec<PhotoFilerError>,
}

/// Tags candidate files with capture time and place
pub struct CatalogBuilder<M, R> {
    metadata: M,
    labeler: PlaceLabeler<R>,
}

impl<M: MetadataResolver, R: PlaceResolver> CatalogBuilder<M, R> {
    pub fn new(metadata: M, places: R) -> Self {
        Self {
            metadata,
            labeler: PlaceLabeler::new(places),
        }
    }

    /// Build a catalog from file and directory arguments
    pub fn build(&mut self, paths: &[PathBuf]) -> CatalogBuild {
        self.build_with_progress(paths, |_, _, _| {})
    }

    /// Build a catalog, reporting `(done, total, current)` after each candidate
    pub fn build_with_progress<F>(&mut self, paths: &[PathBuf], mut on_progress: F) -> CatalogBuild
    where
        F: FnMut(usize, usize, &Path),
    {
        let scanned = expand_paths(paths);
        let total = scanned.files.len();

        let mut build = CatalogBuild {
            catalog: Catalog::new(),
            skipped: scanned.errors.into_iter().map(Into::into).collect(),
        };

        for (i, path) in scanned.files.iter().enumerate() {
            match self.metadata.resolve(path) {
                Ok(meta) => {
                    let place = self.labeler.label(meta.coordinate);
                    debug!(
                        path = %path.display(),
                        captured_at = %meta.captured_at,
                        place = %place,
                        "catalogued"
                    );
                    build
                        .catalog
                        .insert(PhotoRecord::new(path.clone(), meta.captured_at, place));
                }
                Err(e) => {
                    warn!("{}", e);
                    build.skipped.push(e.into());
                }
            }
            on_progress(i + 1, total, path);
        }

        info!(
            photos = build.catalog.len(),
            skipped = build.skipped.len(),
            place_lookups = self.labeler.lookups(),
            "catalog built"
        );
        build
    }
}

//! # Error Module
//!
//! Error types for the photo filer.
//!
//! ## Severity
//! - `ScanError`, `MetadataError` - local to one input, the file is skipped
//! - `GeocodeError` - never surfaced, downgraded to the unknown place label
//! - `PlanError` - fatal for the whole run, raised before anything is touched
//! - `MoveError` - local to one file during execution, collected in the report

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PhotoFilerError {
    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("{0}")]
    Plan(#[from] PlanError),

    #[error("Move error: {0}")]
    Move(#[from] MoveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors for path arguments that cannot be expanded into candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("skipping {path}: no such file or directory")]
    NotFound { path: PathBuf },

    #[error("skipping {path}: not a regular file or directory")]
    NotARegularFile { path: PathBuf },

    #[error("skipping {path}: failed to read directory: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors that exclude a single file from the catalog
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{path}: failed to open: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: no readable metadata: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("{path}: missing required tag `{tag}'")]
    MissingTag { path: PathBuf, tag: &'static str },

    #[error("{path}: tag `{tag}' has unparseable value {value:?}")]
    InvalidTag {
        path: PathBuf,
        tag: &'static str,
        value: String,
    },
}

/// Reverse-geocoding failures
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("failed to build geocoding client: {0}")]
    ClientSetup(String),

    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding server answered HTTP {status}")]
    Status { status: u16 },

    #[error("no address found for {lat}, {lon}")]
    NoResult { lat: f64, lon: f64 },

    #[error("address for {lat}, {lon} has no recognised place component")]
    UnrecognizedAddress { lat: f64, lon: f64 },
}

/// Pre-flight failures that abort the move before any mutation
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("destination already exists: {}", .names.join(", "))]
    DestinationExists { names: Vec<String> },

    #[error("several files would be moved to the same name: {}", format_collisions(.collisions))]
    BasenameCollision { collisions: Vec<BasenameCollision> },
}

/// Two or more source files that reduce to one destination file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasenameCollision {
    pub folder: String,
    pub basename: String,
    pub sources: Vec<PathBuf>,
}

fn format_collisions(collisions: &[BasenameCollision]) -> String {
    collisions
        .iter()
        .map(|c| format!("{}/{}", c.folder, c.basename))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-file failures while executing a plan
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Can't create {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't move {source_path}: folder {folder} could not be created")]
    FolderUnavailable { source_path: PathBuf, folder: String },

    #[error("Can't move {path}: source file not found")]
    SourceMissing { path: PathBuf },

    #[error("Can't move {source_path} to {destination}: destination already exists")]
    DestinationOccupied {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error("Can't move {source_path} to {destination}: {source}")]
    Transfer {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't move {source_path}: copy verification failed (source {expected} bytes, destination {actual} bytes)")]
    CopyVerification {
        source_path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhotoFilerError>;

//! Moves photos into their planned folders.
//!
//! Moving is a two-step protocol. [`Mover::validate`] checks the whole plan
//! against the destination root without touching anything and hands back a
//! [`ValidatedPlan`]; only that type can be executed.

use super::types::*;
use crate::error::{MoveError, PlanError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Validates and executes cluster plans under a destination root
pub struct Mover {
    root: PathBuf,
}

/// A plan that passed pre-flight checks against `root`
#[derive(Debug)]
pub struct ValidatedPlan<'p> {
    root: PathBuf,
    plan: &'p ClusterPlan,
}

impl Mover {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pre-flight check of the entire plan
    ///
    /// Fails if any folder name already exists under the root, or if two
    /// source files would land on the same name inside one folder.
    pub fn validate<'p>(&self, plan: &'p ClusterPlan) -> Result<ValidatedPlan<'p>, PlanError> {
        let existing: Vec<String> = plan
            .keys()
            .filter(|key| fs::symlink_metadata(self.root.join(key)).is_ok())
            .map(String::from)
            .collect();
        if !existing.is_empty() {
            warn!(count = existing.len(), "destination folders already exist");
            return Err(PlanError::DestinationExists { names: existing });
        }

        let collisions = plan.basename_collisions();
        if !collisions.is_empty() {
            warn!(count = collisions.len(), "basename collisions in plan");
            return Err(PlanError::BasenameCollision { collisions });
        }

        Ok(ValidatedPlan {
            root: self.root.clone(),
            plan,
        })
    }
}

impl ValidatedPlan<'_> {
    pub fn plan(&self) -> &ClusterPlan {
        self.plan
    }

    /// Create every folder and move every file
    pub fn execute(self) -> MoveReport {
        self.execute_with_progress(|_, _, _| {})
    }

    /// Execute, reporting `(done, total, basename)` at most every 100ms and once at the end
    pub fn execute_with_progress<F>(self, mut on_progress: F) -> MoveReport
    where
        F: FnMut(usize, usize, &str),
    {
        let start = Instant::now();
        let mut last_progress = Instant::now();
        const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

        let total = self.plan.photo_count();
        let mut done = 0usize;
        let mut report = MoveReport::default();

        for cluster in self.plan.clusters() {
            let folder = self.root.join(&cluster.key);

            if let Err(source) = fs::create_dir(&folder) {
                warn!(folder = %folder.display(), "failed to create folder: {}", source);
                report.failures.push(MoveError::CreateDirectory {
                    path: folder.clone(),
                    source,
                });
                for member in &cluster.members {
                    report.failures.push(MoveError::FolderUnavailable {
                        source_path: member.source.clone(),
                        folder: cluster.key.clone(),
                    });
                }
                done += cluster.members.len();
                continue;
            }
            report.folders_created += 1;

            for member in &cluster.members {
                done += 1;
                let now = Instant::now();
                if now.duration_since(last_progress) >= PROGRESS_INTERVAL {
                    on_progress(done, total, &member.basename);
                    last_progress = now;
                }

                let destination = folder.join(&member.basename);
                match move_file(&member.source, &destination) {
                    Ok(()) => {
                        debug!(
                            from = %member.source.display(),
                            to = %destination.display(),
                            "moved"
                        );
                        report.files_moved += 1;
                    }
                    Err(e) => {
                        warn!("{}", e);
                        report.failures.push(e);
                    }
                }
            }
        }

        on_progress(total, total, "");
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            moved = report.files_moved,
            folders = report.folders_created,
            failed = report.failures.len(),
            "plan executed"
        );
        report
    }
}

/// Move one file, never overwriting an existing destination
///
/// `rename` fails across filesystems; the fallback copies, checks the size,
/// and only then removes the source.
fn move_file(source: &Path, destination: &Path) -> Result<(), MoveError> {
    if !source.is_file() {
        return Err(MoveError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    if fs::symlink_metadata(destination).is_ok() {
        return Err(MoveError::DestinationOccupied {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    let transfer = |source_err: std::io::Error| MoveError::Transfer {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source: source_err,
    };

    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    let expected = fs::metadata(source).map_err(transfer)?.len();
    fs::copy(source, destination).map_err(transfer)?;

    let actual = fs::metadata(destination).map(|m| m.len()).unwrap_or(0);
    if actual != expected {
        discard_copy(destination);
        return Err(MoveError::CopyVerification {
            source_path: source.to_path_buf(),
            expected,
            actual,
        });
    }

    if let Err(e) = fs::remove_file(source) {
        // Leave exactly one copy behind.
        discard_copy(destination);
        return Err(transfer(e));
    }
    Ok(())
}

/// Remove a copy that must not survive; returns whether it is gone
fn discard_copy(destination: &Path) -> bool {
    match fs::remove_file(destination) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                path = %destination.display(),
                "failed to remove partial copy, file now exists twice: {}", e
            );
            false
        }
    }
}

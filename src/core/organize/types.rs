//! Types for the organize module.

use crate::error::{BasenameCollision, MoveError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// A photo assigned to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// File name it will have inside the destination folder
    pub basename: String,
    /// Where the file currently lives
    pub source: PathBuf,
}

/// Photos that go into one destination folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Folder name: "<anchor time> <anchor place>"
    pub key: String,
    /// Members in the order they were assigned
    pub members: Vec<ClusterMember>,
}

impl Cluster {
    /// Member basenames, sorted
    pub fn sorted_basenames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.iter().map(|m| m.basename.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// The proposed grouping, keyed by folder name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPlan {
    clusters: BTreeMap<String, Cluster>,
}

impl ClusterPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member to the cluster named `key`, creating it if needed
    pub fn push(&mut self, key: &str, member: ClusterMember) {
        self.clusters
            .entry(key.to_string())
            .or_insert_with(|| Cluster {
                key: key.to_string(),
                members: Vec::new(),
            })
            .members
            .push(member);
    }

    pub fn get(&self, key: &str) -> Option<&Cluster> {
        self.clusters.get(key)
    }

    /// Clusters in key order
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// Folder names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    /// Number of folders
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of photos across all folders
    pub fn photo_count(&self) -> usize {
        self.clusters.values().map(|c| c.members.len()).sum()
    }

    /// Folders in which two different source files share a basename
    pub fn basename_collisions(&self) -> Vec<BasenameCollision> {
        let mut collisions = Vec::new();

        for cluster in self.clusters.values() {
            let mut by_name: HashMap<&str, Vec<&PathBuf>> = HashMap::new();
            for member in &cluster.members {
                by_name.entry(&member.basename).or_default().push(&member.source);
            }

            let mut clashing: Vec<BasenameCollision> = by_name
                .into_iter()
                .filter(|(_, sources)| sources.len() > 1)
                .map(|(basename, sources)| {
                    let mut sources: Vec<PathBuf> = sources.into_iter().cloned().collect();
                    sources.sort();
                    BasenameCollision {
                        folder: cluster.key.clone(),
                        basename: basename.to_string(),
                        sources,
                    }
                })
                .collect();
            clashing.sort_by(|a, b| a.basename.cmp(&b.basename));
            collisions.extend(clashing);
        }

        collisions
    }
}

/// Result of executing a plan
#[derive(Debug, Default)]
pub struct MoveReport {
    pub files_moved: usize,
    pub folders_created: usize,
    pub duration_ms: u64,
    /// Files left in place, with the reason
    pub failures: Vec<MoveError>,
}

impl MoveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of photos that were not moved
    pub fn files_left(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| !matches!(f, MoveError::CreateDirectory { .. }))
            .count()
    }
}

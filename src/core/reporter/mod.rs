//! # Reporter Module
//!
//! Renders a cluster plan for review before anything is moved.
//!
//! Folders are listed in key order and the files inside each folder in
//! name order. This ordering is for display only; it says nothing about
//! the order the clusterer assigned them in.

use crate::core::organize::ClusterPlan;
use std::fmt::Write;

/// First line of every rendered plan
pub const PLAN_HEADER: &str = "Proposed directory structure:";

/// Render the plan as a header, one line per folder and one indented line per file
pub fn render_plan(plan: &ClusterPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", PLAN_HEADER);
    for cluster in plan.clusters() {
        let _ = writeln!(out, "{}", cluster.key);
        for name in cluster.sorted_basenames() {
            let _ = writeln!(out, "  - {}", name);
        }
    }
    out
}

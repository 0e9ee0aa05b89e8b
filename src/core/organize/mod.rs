//! Photo organization module.
//!
//! Groups catalogued photos into "<time> <place>" folders and moves them there.

mod executor;
mod planner;
mod types;

pub use executor::{Mover, ValidatedPlan};
pub use planner::{Clusterer, ADJACENCY_WINDOW_MINUTES, KEY_TIME_FORMAT};
pub use types::*;

//! Total place labelling on top of a fallible resolver.

use super::{PlaceResolver, UNKNOWN_PLACE};
use crate::core::metadata::Coordinate;
use std::collections::HashMap;
use tracing::debug;

/// Always produces a place label; lookups that fail become [`UNKNOWN_PLACE`]
///
/// Labels are memoised per exact coordinate, so a burst of shots from one
/// spot costs a single lookup.
pub struct PlaceLabeler<R> {
    resolver: R,
    memo: HashMap<(u64, u64), String>,
    lookups: usize,
}

impl<R: PlaceResolver> PlaceLabeler<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            memo: HashMap::new(),
            lookups: 0,
        }
    }

    /// Label for an optional coordinate
    pub fn label(&mut self, coordinate: Option<Coordinate>) -> String {
        let Some(coordinate) = coordinate else {
            return UNKNOWN_PLACE.to_string();
        };

        let key = (coordinate.lat.to_bits(), coordinate.lon.to_bits());
        if let Some(label) = self.memo.get(&key) {
            return label.clone();
        }

        self.lookups += 1;
        let label = match self.resolver.resolve(coordinate) {
            Ok(label) => label,
            Err(e) => {
                debug!("falling back to {}: {}", UNKNOWN_PLACE, e);
                UNKNOWN_PLACE.to_string()
            }
        };

        self.memo.insert(key, label.clone());
        label
    }

    /// Number of calls made to the underlying resolver
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

//! # Geocode Module
//!
//! Turns a GPS position into a short place label.
//!
//! ## Components
//! - `PlaceResolver` - a fallible lookup (network, rate limits, no result)
//! - `NominatimResolver` - OpenStreetMap reverse geocoding over HTTP
//! - `PlaceLabeler` - wraps a resolver into a total function that always
//!   yields a label, falling back to [`UNKNOWN_PLACE`]

mod labeler;
mod nominatim;

pub use labeler::PlaceLabeler;
pub use nominatim::{label_from_address, NominatimConfig, NominatimResolver, ADDRESS_PREFERENCE};

use super::metadata::Coordinate;
use crate::error::GeocodeError;

/// Label used whenever a place cannot be determined
pub const UNKNOWN_PLACE: &str = "unknown";

/// Reverse geocoder
pub trait PlaceResolver {
    /// Resolve a coordinate to a short place label
    fn resolve(&self, coordinate: Coordinate) -> Result<String, GeocodeError>;
}

impl<R: PlaceResolver + ?Sized> PlaceResolver for Box<R> {
    fn resolve(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        (**self).resolve(coordinate)
    }
}

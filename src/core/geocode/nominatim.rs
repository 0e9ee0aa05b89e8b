//! Reverse geocoding against a Nominatim server.
//!
//! Requests are blocking and spaced at least one second apart, which is
//! the public server's usage policy. Failures are returned as-is; there
//! are no retries.

use super::{Coordinate, PlaceResolver};
use crate::error::GeocodeError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Address components tried in order, most specific first
pub const ADDRESS_PREFERENCE: &[&str] = &[
    "footway",
    "path",
    "neighbourhood",
    "hamlet",
    "village",
    "town",
    "city",
    "county",
    "state",
    "country",
];

/// Connection settings for a Nominatim server
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Reverse endpoint, e.g. `https://nominatim.openstreetmap.org/reverse`
    pub endpoint: String,
    /// Sent as the User-Agent header (required by the public server)
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum spacing between two requests
    pub min_interval: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            user_agent: format!("photo-filer/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(10),
            min_interval: Duration::from_millis(1000),
        }
    }
}

/// Reverse response body; only the parts we read
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Map<String, Value>>,
    error: Option<String>,
}

/// Rate limiter state
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Nominatim reverse-geocoding client
pub struct NominatimResolver {
    endpoint: String,
    http_client: Client,
    rate_limiter: Mutex<RateLimiter>,
}

impl NominatimResolver {
    /// Create a client for the given server
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::ClientSetup(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint,
            http_client,
            rate_limiter: Mutex::new(RateLimiter::new(config.min_interval)),
        })
    }
}

impl PlaceResolver for NominatimResolver {
    fn resolve(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        if let Ok(mut limiter) = self.rate_limiter.lock() {
            limiter.wait_if_needed();
        }

        debug!(lat = coordinate.lat, lon = coordinate.lon, "reverse geocoding");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lon.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()?;
        check_status(response.status())?;
        let body: ReverseResponse = response.json()?;

        let no_result = GeocodeError::NoResult {
            lat: coordinate.lat,
            lon: coordinate.lon,
        };
        if body.error.is_some() {
            return Err(no_result);
        }
        let address = body.address.ok_or(no_result)?;

        label_from_address(&address).ok_or(GeocodeError::UnrecognizedAddress {
            lat: coordinate.lat,
            lon: coordinate.lon,
        })
    }
}

fn check_status(status: StatusCode) -> Result<(), GeocodeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(GeocodeError::Status {
            status: status.as_u16(),
        })
    }
}

/// Pick the most specific non-empty component of a Nominatim address
///
/// Path separators are replaced so the label can be part of a folder name.
pub fn label_from_address(address: &Map<String, Value>) -> Option<String> {
    ADDRESS_PREFERENCE.iter().find_map(|key| {
        address
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.replace(['/', '\\'], "-"))
    })
}

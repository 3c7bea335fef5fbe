//! Free-text address resolution via the Nominatim API

use std::time::Duration;

use geo::Point;
use log::{debug, info};
use serde::Deserialize;

use crate::Error;

const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Explicit geocoder configuration, passed at construction
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NOMINATIM_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("waypath/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

pub struct Geocoder {
    config: GeocoderConfig,
}

impl Geocoder {
    pub fn new(config: GeocoderConfig) -> Self {
        Self { config }
    }

    /// Resolve a free-text address to a (longitude, latitude) point.
    ///
    /// # Errors
    ///
    /// Every provider failure (no match, transport error, timeout,
    /// malformed body) maps to `Error::Resolution` carrying the
    /// offending address, so the caller can report both endpoints
    /// before aborting.
    pub fn geocode(&self, address: &str) -> Result<Point<f64>, Error> {
        let address = address.trim();
        if address.is_empty() {
            return Err(resolution(address, "address must not be empty"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| resolution(address, &e.to_string()))?;

        debug!("geocoding {address:?} via {}", self.config.endpoint);
        let response = client
            .get(&self.config.endpoint)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .map_err(|e| resolution(address, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(resolution(address, &format!("provider returned {status}")));
        }

        let body = response
            .text()
            .map_err(|e| resolution(address, &e.to_string()))?;
        parse_response(address, &body)
    }
}

/// Parse a Nominatim search response body. Split out of the HTTP path
/// so resolution semantics are testable offline.
fn parse_response(address: &str, body: &str) -> Result<Point<f64>, Error> {
    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| resolution(address, &format!("malformed response: {e}")))?;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| resolution(address, "no match found"))?;

    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| resolution(address, "malformed latitude in response"))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| resolution(address, "malformed longitude in response"))?;

    info!("resolved {address:?} to ({lon}, {lat}): {}", place.display_name);
    Ok(Point::new(lon, lat))
}

fn resolution(address: &str, reason: &str) -> Error {
    Error::Resolution {
        address: address.to_string(),
        reason: reason.to_string(),
    }
}

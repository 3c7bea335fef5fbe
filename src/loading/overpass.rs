//! Overpass API client and response types

use std::fs;
use std::path::{Path, PathBuf};

use geo::Rect;
use log::{debug, info, warn};
use serde::Deserialize;

use super::{NetworkConfig, TravelMode};
use crate::Error;

pub(crate) const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsmElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub nodes: Option<Vec<i64>>,
    pub tags: Option<OsmTags>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OsmTags {
    pub highway: Option<String>,
    pub oneway: Option<String>,
    pub maxspeed: Option<String>,
}

/// Overpass QL query for all ways of the mode's highway classes
/// intersecting the region. Overpass bbox order is south,west,north,east.
pub(crate) fn build_query(region: &Rect<f64>, mode: TravelMode) -> String {
    format!(
        "[out:json][timeout:120];\n(\n  way[\"highway\"~\"{}\"]({},{},{},{});\n);\n(._;>;);\nout body;",
        mode.highway_filter(),
        region.min().y,
        region.min().x,
        region.max().y,
        region.max().x,
    )
}

/// Fetch the raw element list for a region, going through the on-disk
/// cache when one is configured.
pub(crate) fn fetch_elements(
    region: &Rect<f64>,
    mode: TravelMode,
    config: &NetworkConfig,
) -> Result<OverpassResponse, Error> {
    let query = build_query(region, mode);
    debug!("Overpass query:\n{query}");

    if let Some(dir) = &config.cache_dir {
        let path = cache_path(dir, region, mode);
        if let Some(cached) = read_cache(&path) {
            info!("using cached Overpass response: {}", path.display());
            return Ok(cached);
        }
        let body = request(&query, config)?;
        write_cache(&path, &body);
        return parse_body(&body);
    }

    let body = request(&query, config)?;
    parse_body(&body)
}

fn request(query: &str, config: &NetworkConfig) -> Result<String, Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| Error::NetworkAcquisition(e.to_string()))?;

    info!("requesting road network from {}", config.overpass_url);
    let response = client
        .post(&config.overpass_url)
        .header("Content-Type", "text/plain")
        .body(query.to_string())
        .send()
        .map_err(|e| Error::NetworkAcquisition(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::NetworkAcquisition(format!(
            "Overpass API returned status {status}"
        )));
    }

    response
        .text()
        .map_err(|e| Error::NetworkAcquisition(e.to_string()))
}

pub(crate) fn parse_body(body: &str) -> Result<OverpassResponse, Error> {
    serde_json::from_str(body)
        .map_err(|e| Error::NetworkAcquisition(format!("malformed Overpass response: {e}")))
}

fn cache_path(dir: &Path, region: &Rect<f64>, mode: TravelMode) -> PathBuf {
    dir.join(format!(
        "{:?}_{:.4}_{:.4}_{:.4}_{:.4}.json",
        mode,
        region.min().y,
        region.min().x,
        region.max().y,
        region.max().x,
    ))
}

fn read_cache(path: &Path) -> Option<OverpassResponse> {
    let body = fs::read_to_string(path).ok()?;
    match parse_body(&body) {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("discarding corrupt cache entry {}: {e}", path.display());
            let _ = fs::remove_file(path);
            None
        }
    }
}

fn write_cache(path: &Path, body: &str) {
    // Cache misses are not fatal, the response is already in hand
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("could not create cache directory {}: {e}", dir.display());
            return;
        }
    }
    if let Err(e) = fs::write(path, body) {
        warn!("could not write cache entry {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect};

    use super::*;

    fn region() -> Rect<f64> {
        Rect::new(
            Coord { x: -122.1, y: 37.4 },
            Coord { x: -122.0, y: 37.5 },
        )
    }

    #[test]
    fn query_uses_south_west_north_east_order() {
        let query = build_query(&region(), TravelMode::Drive);
        assert!(query.contains("(37.4,-122.1,37.5,-122)"));
        assert!(query.contains("[out:json]"));
        assert!(query.contains("motorway"));
    }

    #[test]
    fn walk_query_excludes_motorways() {
        let query = build_query(&region(), TravelMode::Walk);
        assert!(!query.contains("motorway"));
        assert!(query.contains("footway"));
    }

    #[test]
    fn parses_nodes_and_ways() {
        let body = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 37.42, "lon": -122.08},
                {"type": "way", "id": 10, "nodes": [1, 2],
                 "tags": {"highway": "residential", "oneway": "yes"}}
            ]
        }"#;
        let response = parse_body(body).unwrap();
        assert_eq!(response.elements.len(), 2);
        assert_eq!(response.elements[0].element_type, "node");
        let way = &response.elements[1];
        assert_eq!(way.nodes.as_deref(), Some(&[1, 2][..]));
        assert_eq!(
            way.tags.as_ref().unwrap().highway.as_deref(),
            Some("residential")
        );
    }

    #[test]
    fn malformed_body_is_an_acquisition_failure() {
        assert!(matches!(
            parse_body("not json"),
            Err(Error::NetworkAcquisition(_))
        ));
    }

    #[test]
    fn cache_round_trip() {
        let dir = std::env::temp_dir().join(format!("waypath-cache-{}", std::process::id()));
        let path = cache_path(&dir, &region(), TravelMode::Drive);
        let body = r#"{"elements": []}"#;

        write_cache(&path, body);
        let cached = read_cache(&path).unwrap();
        assert!(cached.elements.is_empty());

        // A corrupt entry is discarded rather than served
        fs::write(&path, "garbage").unwrap();
        assert!(read_cache(&path).is_none());
        assert!(!path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}

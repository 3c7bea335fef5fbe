//! Interactive map document and console summary formatting
//!
//! The map itself is a self-contained Leaflet page over OSM tiles;
//! tile rendering is entirely the browser's job.

use std::fs;
use std::path::Path;

use geo::Point;
use serde_json::json;

use crate::Error;
use crate::model::RoadNetwork;
use crate::routing::Route;
use crate::units::{meters_to_miles, round_half_up, seconds_to_minutes};

/// Output document written to the working directory
pub const MAP_FILE_NAME: &str = "shortest_path_map.html";

/// One-line human-readable summary of distance (miles) and time
/// (minutes), each to one decimal place rounded half-up. Absent
/// routes degrade the wording instead of failing.
pub fn format_summary(length_meters: Option<f64>, time_seconds: Option<f64>) -> String {
    let miles = length_meters.map(|m| round_half_up(meters_to_miles(m), 1));
    let minutes = time_seconds.map(|s| round_half_up(seconds_to_minutes(s), 1));
    match (miles, minutes) {
        (Some(miles), Some(minutes)) => format!(
            "Shortest route: {miles:.1} miles, estimated driving time: {minutes:.1} minutes"
        ),
        (Some(miles), None) => {
            format!("Shortest route: {miles:.1} miles (travel time unavailable)")
        }
        (None, Some(minutes)) => {
            format!("Estimated driving time: {minutes:.1} minutes (distance unavailable)")
        }
        (None, None) => "No route available".to_string(),
    }
}

/// Render the computed route(s) as a standalone interactive map:
/// labeled start/end markers, a red overlay for the length-optimized
/// route, a yellow one for the time-optimized route, and the summary
/// bound to each overlay as a popup. Absent routes are skipped.
pub fn render_map(
    network: &RoadNetwork,
    origin: Point<f64>,
    destination: Point<f64>,
    by_length: Option<&Route>,
    by_time: Option<&Route>,
    summary: &str,
) -> String {
    let origin_latlng = json!([origin.y(), origin.x()]).to_string();
    let destination_latlng = json!([destination.y(), destination.x()]).to_string();
    let bounds = json!([
        [
            origin.y().min(destination.y()),
            origin.x().min(destination.x())
        ],
        [
            origin.y().max(destination.y()),
            origin.x().max(destination.x())
        ]
    ])
    .to_string();
    let popup = json!(summary).to_string();

    let mut overlays = String::new();
    if let Some(route) = by_length {
        overlays.push_str(&polyline_js(network, route, "red", &popup));
    }
    if let Some(route) = by_time {
        overlays.push_str(&polyline_js(network, route, "yellow", &popup));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Shortest path</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map');
map.fitBounds({bounds}, {{ padding: [30, 30] }});
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
L.marker({origin_latlng}).addTo(map).bindPopup("Start");
L.marker({destination_latlng}).addTo(map).bindPopup("End");
{overlays}</script>
</body>
</html>
"#
    )
}

fn polyline_js(network: &RoadNetwork, route: &Route, color: &str, popup: &str) -> String {
    let latlngs: Vec<[f64; 2]> = route
        .nodes()
        .iter()
        .filter_map(|&node| network.node_point(node))
        .map(|point| [point.y(), point.x()])
        .collect();
    format!(
        "L.polyline({}, {{ color: '{color}', weight: 6, opacity: 0.8 }}).addTo(map).bindPopup({popup});\n",
        json!(latlngs)
    )
}

/// Persist the rendered document, silently overwriting any previous run
pub fn write_map(path: &Path, html: &str) -> Result<(), Error> {
    fs::write(path, html)?;
    Ok(())
}

//! Free-flow speed estimates per OSM highway classification

use hashbrown::HashMap;

use super::TravelMode;

const KMH_PER_MPH: f64 = 1.609344;
const FALLBACK_SPEED_KMH: f64 = 30.0;

pub(crate) const WALK_SPEED_KMH: f64 = 4.8;
pub(crate) const BIKE_SPEED_KMH: f64 = 15.0;

/// Driving speed table keyed by highway classification, with optional
/// per-class overrides. A parseable `maxspeed` way tag always wins.
#[derive(Debug, Clone, Default)]
pub struct SpeedTable {
    overrides: HashMap<String, f64>,
}

impl SpeedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the free-flow speed (km/h) for one highway class
    pub fn with_override(mut self, highway: &str, kmh: f64) -> Self {
        self.overrides.insert(highway.to_string(), kmh);
        self
    }

    /// Free-flow speed estimate in km/h for an edge of the given mode
    pub fn speed_kmh(&self, mode: TravelMode, highway: &str, maxspeed: Option<&str>) -> f64 {
        match mode {
            TravelMode::Walk => WALK_SPEED_KMH,
            TravelMode::Bike => BIKE_SPEED_KMH,
            TravelMode::Drive => {
                if let Some(kmh) = maxspeed.and_then(parse_maxspeed) {
                    return kmh;
                }
                if let Some(&kmh) = self.overrides.get(highway) {
                    return kmh;
                }
                default_drive_speed_kmh(highway)
            }
        }
    }

    /// Same estimate in m/s, the unit carried on edges
    pub fn speed_mps(&self, mode: TravelMode, highway: &str, maxspeed: Option<&str>) -> f64 {
        self.speed_kmh(mode, highway, maxspeed) * 1000.0 / 3600.0
    }
}

fn default_drive_speed_kmh(highway: &str) -> f64 {
    match highway {
        "motorway" | "motorway_link" => 100.0,
        "trunk" | "trunk_link" => 80.0,
        "primary" | "primary_link" => 60.0,
        "secondary" | "secondary_link" => 50.0,
        "tertiary" | "tertiary_link" => 40.0,
        "residential" | "unclassified" => 30.0,
        "service" => 20.0,
        "living_street" => 10.0,
        _ => FALLBACK_SPEED_KMH,
    }
}

/// Parse an OSM `maxspeed` tag: a bare km/h number or `N mph`.
/// Non-numeric values (`none`, `walk`, `signals`) and non-positive
/// values are ignored; edge weights must stay positive and finite.
fn parse_maxspeed(tag: &str) -> Option<f64> {
    let tag = tag.trim();
    let kmh = if let Some(mph) = tag.strip_suffix("mph") {
        mph.trim().parse::<f64>().ok().map(|v| v * KMH_PER_MPH)
    } else {
        tag.parse::<f64>().ok()
    };
    kmh.filter(|v| *v > 0.0)
}

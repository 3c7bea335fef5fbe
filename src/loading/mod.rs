//! Road network acquisition from the Overpass API

mod builder;
mod overpass;
mod speed;

use std::path::PathBuf;
use std::time::Duration;

use geo::Rect;
use log::info;

use crate::Error;
use crate::model::RoadNetwork;

pub use speed::SpeedTable;

/// Travel mode selecting the highway classes fetched from OSM and the
/// speed model applied to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Drive,
    Walk,
    Bike,
}

impl TravelMode {
    /// Highway classes fetched and kept for this mode
    pub(crate) fn highway_classes(self) -> &'static [&'static str] {
        match self {
            TravelMode::Drive => &[
                "motorway",
                "motorway_link",
                "trunk",
                "trunk_link",
                "primary",
                "primary_link",
                "secondary",
                "secondary_link",
                "tertiary",
                "tertiary_link",
                "residential",
                "unclassified",
                "service",
                "living_street",
            ],
            TravelMode::Walk => &[
                "footway",
                "path",
                "pedestrian",
                "steps",
                "living_street",
                "residential",
                "service",
                "unclassified",
                "tertiary",
                "secondary",
                "primary",
            ],
            TravelMode::Bike => &[
                "cycleway",
                "path",
                "living_street",
                "residential",
                "service",
                "unclassified",
                "tertiary",
                "tertiary_link",
                "secondary",
                "secondary_link",
                "primary",
                "primary_link",
            ],
        }
    }

    /// Overpass regex over the `highway` tag for this mode
    pub(crate) fn highway_filter(self) -> String {
        format!("^({})$", self.highway_classes().join("|"))
    }

    pub(crate) fn allows(self, highway: &str) -> bool {
        self.highway_classes().contains(&highway)
    }
}

/// Explicit configuration for the network-acquisition component.
/// Replaces any notion of ambient module-level toggles.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub overpass_url: String,
    /// Applied to the whole blocking request; expiry is a reportable
    /// acquisition failure.
    pub timeout: Duration,
    pub user_agent: String,
    /// Cache raw Overpass responses on disk, keyed by region bounds.
    /// `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            overpass_url: overpass::DEFAULT_OVERPASS_URL.to_string(),
            timeout: Duration::from_secs(180),
            user_agent: concat!("waypath/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_dir: None,
        }
    }
}

/// Client materializing road networks for a bounding region
pub struct NetworkClient {
    config: NetworkConfig,
    speeds: SpeedTable,
}

impl NetworkClient {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            speeds: SpeedTable::new(),
        }
    }

    pub fn with_speeds(config: NetworkConfig, speeds: SpeedTable) -> Self {
        Self { config, speeds }
    }

    /// Fetch all road segments of `mode` intersecting `region` and
    /// build the routable graph, augmenting every edge with a speed
    /// estimate and a derived travel time.
    ///
    /// With `truncate_at_boundary`, edges reaching out of the region
    /// are kept as long as one endpoint lies inside; otherwise both
    /// endpoints must be inside.
    ///
    /// # Errors
    ///
    /// `Error::NetworkAcquisition` on transport or service failure,
    /// `Error::EmptyNetwork` if no roads of the mode exist in the
    /// region.
    pub fn fetch(
        &self,
        region: &Rect<f64>,
        mode: TravelMode,
        truncate_at_boundary: bool,
    ) -> Result<RoadNetwork, Error> {
        let response = overpass::fetch_elements(region, mode, &self.config)?;
        info!("Overpass returned {} elements", response.elements.len());

        let network =
            builder::build_network(&response, region, mode, truncate_at_boundary, &self.speeds)?;
        info!(
            "built road network with {} nodes and {} edges",
            network.node_count(),
            network.edge_count()
        );
        Ok(network)
    }
}

/// Build a road network from a raw Overpass JSON body without touching
/// the network. Useful for previously cached responses and for tests.
///
/// # Errors
///
/// Same failure modes as [`NetworkClient::fetch`], minus transport.
pub fn network_from_overpass_json(
    body: &str,
    region: &Rect<f64>,
    mode: TravelMode,
    truncate_at_boundary: bool,
    speeds: &SpeedTable,
) -> Result<RoadNetwork, Error> {
    let response = overpass::parse_body(body)?;
    builder::build_network(&response, region, mode, truncate_at_boundary, speeds)
}

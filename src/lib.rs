//! Address-to-address route finding on OpenStreetMap data
//!
//! Geocodes two street addresses, downloads the drivable road network
//! around them, computes the shortest path by distance and by
//! estimated travel time, and renders the result to an interactive
//! HTML map. Routing, geocoding, and map display are all delegated to
//! external collaborators; this crate only orchestrates them.

pub mod error;
pub mod geocode;
pub mod loading;
pub mod model;
pub mod region;
pub mod render;
pub mod routing;
pub mod units;

pub use error::Error;
pub use geocode::{Geocoder, GeocoderConfig};
pub use loading::{
    NetworkClient, NetworkConfig, SpeedTable, TravelMode, network_from_overpass_json,
};
pub use model::{RoadNetwork, Weight};
pub use region::{DEFAULT_BUFFER_DEGREES, bounding_region};
pub use render::{MAP_FILE_NAME, format_summary, render_map, write_map};
pub use routing::{Route, shortest_path, summarize};

//! Drivable road network model

pub mod network;

pub use network::{IndexedPoint, RoadEdge, RoadNetwork, RoadNode, Weight};

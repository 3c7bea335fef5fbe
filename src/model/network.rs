//! Road graph with a spatial index for snapping coordinates to nodes

use std::fmt;

use geo::{Distance, Haversine, Point};
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::Error;

/// Edge attribute minimized by a shortest-path query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Length,
    TravelTime,
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Length => write!(f, "length"),
            Weight::TravelTime => write!(f, "travel_time"),
        }
    }
}

/// Road graph node (OSM intersection or way vertex)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// OSM ID of the node
    pub osm_id: i64,
    /// Node coordinates (longitude, latitude)
    pub geometry: Point<f64>,
}

/// Road segment between two nodes
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Segment length in meters
    pub length: f64,
    /// Free-flow speed estimate in meters per second
    pub speed: f64,
    /// Derived travel time in seconds (length / speed)
    pub travel_time: f64,
}

impl RoadEdge {
    pub fn weight(&self, attribute: Weight) -> f64 {
        match attribute {
            Weight::Length => self.length,
            Weight::TravelTime => self.travel_time,
        }
    }
}

/// Node position stored in the R-tree for nearest-node queries
#[derive(Debug, Clone)]
pub struct IndexedPoint {
    pub node: NodeIndex,
    pub position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Directed road network restricted to one travel mode.
/// Read-only after construction.
pub struct RoadNetwork {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
}

impl RoadNetwork {
    pub(crate) fn new(graph: DiGraph<RoadNode, RoadEdge>) -> Self {
        let points = graph
            .node_indices()
            .map(|node| IndexedPoint {
                node,
                position: [graph[node].geometry.x(), graph[node].geometry.y()],
            })
            .collect();
        Self {
            graph,
            rtree: RTree::bulk_load(points),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Snap a coordinate to the geometrically nearest graph node.
    /// Returns the node and the straight-line distance to it in meters.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPointsFound` if the network has no nodes.
    pub fn nearest_node(&self, point: &Point<f64>) -> Result<(NodeIndex, f64), Error> {
        let nearest = self
            .rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .ok_or(Error::NoPointsFound)?;
        let distance = Haversine.distance(*point, self.graph[nearest.node].geometry);
        Ok((nearest.node, distance))
    }

    /// Coordinates of a graph node, if it exists
    pub fn node_point(&self, node: NodeIndex) -> Option<Point<f64>> {
        self.graph.node_weight(node).map(|n| n.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> RoadNetwork {
        let mut graph = DiGraph::new();
        let a = graph.add_node(RoadNode {
            osm_id: 1,
            geometry: Point::new(-122.0, 37.0),
        });
        let b = graph.add_node(RoadNode {
            osm_id: 2,
            geometry: Point::new(-122.0, 37.01),
        });
        graph.add_edge(
            a,
            b,
            RoadEdge {
                length: 1112.0,
                speed: 8.33,
                travel_time: 133.5,
            },
        );
        RoadNetwork::new(graph)
    }

    #[test]
    fn snaps_to_the_closest_node() {
        let network = two_node_network();
        let (node, distance) = network
            .nearest_node(&Point::new(-122.0001, 37.0101))
            .unwrap();
        assert_eq!(network.graph[node].osm_id, 2);
        // Roughly 14 m: 0.0001 deg in each direction
        assert!(distance > 0.0 && distance < 50.0);
    }

    #[test]
    fn snapping_an_exact_node_position_has_zero_offset() {
        let network = two_node_network();
        let (node, distance) = network.nearest_node(&Point::new(-122.0, 37.0)).unwrap();
        assert_eq!(network.graph[node].osm_id, 1);
        assert!(distance < 1e-6);
    }

    #[test]
    fn empty_network_cannot_snap() {
        let network = RoadNetwork::new(DiGraph::new());
        assert!(matches!(
            network.nearest_node(&Point::new(0.0, 0.0)),
            Err(Error::NoPointsFound)
        ));
    }
}

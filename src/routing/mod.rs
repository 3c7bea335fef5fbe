//! Shortest-path queries over the road network
//!
//! The search itself is delegated to petgraph: A* with a zero
//! heuristic, which degenerates to Dijkstra and returns the full
//! node path.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;

use crate::Error;
use crate::model::{RoadNetwork, Weight};

/// Ordered node sequence from the snapped origin to the snapped
/// destination. Two routes are produced per run, one per [`Weight`],
/// and they may legitimately diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    nodes: Vec<NodeIndex>,
}

impl Route {
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Shortest path between two graph nodes under the chosen edge weight.
///
/// # Errors
///
/// Returns `Error::NoPathFound` if `from` and `to` are not connected.
pub fn shortest_path(
    network: &RoadNetwork,
    from: NodeIndex,
    to: NodeIndex,
    weight: Weight,
) -> Result<Route, Error> {
    let (_, nodes) = astar(
        &network.graph,
        from,
        |node| node == to,
        |edge| OrderedFloat(edge.weight().weight(weight)),
        |_| OrderedFloat(0.0),
    )
    .ok_or(Error::NoPathFound {
        from: from.index(),
        to: to.index(),
    })?;
    Ok(Route { nodes })
}

/// Sum of the named edge attribute over every edge the route traverses.
/// Parallel edges between a node pair contribute their minimum under
/// the named attribute; for a route optimized under a different
/// attribute this makes the sum a lower bound.
///
/// # Errors
///
/// An absent route is `Error::MissingRoute` (contract violation at the
/// call site); a node pair with no connecting edge is
/// `Error::InvalidRoute`.
pub fn summarize(
    network: &RoadNetwork,
    route: Option<&Route>,
    attribute: Weight,
) -> Result<f64, Error> {
    let route = route.ok_or(Error::MissingRoute)?;
    let mut total = 0.0;
    for (a, b) in route.nodes().iter().tuple_windows() {
        let best = network
            .graph
            .edges_connecting(*a, *b)
            .map(|edge| OrderedFloat(edge.weight().weight(attribute)))
            .min()
            .ok_or(Error::InvalidRoute)?;
        total += best.0;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use geo::Point;
    use petgraph::graph::DiGraph;

    use super::*;
    use crate::model::{RoadEdge, RoadNode};

    fn edge(length: f64, speed: f64) -> RoadEdge {
        RoadEdge {
            length,
            speed,
            travel_time: length / speed,
        }
    }

    /// Two ways from a to c: a short slow one through b and a longer
    /// fast one through d. An isolated node e has no connection.
    fn diamond() -> (RoadNetwork, Vec<NodeIndex>) {
        let mut graph = DiGraph::new();
        let a = graph.add_node(RoadNode {
            osm_id: 1,
            geometry: Point::new(-122.000, 37.000),
        });
        let b = graph.add_node(RoadNode {
            osm_id: 2,
            geometry: Point::new(-122.000, 37.001),
        });
        let c = graph.add_node(RoadNode {
            osm_id: 3,
            geometry: Point::new(-122.000, 37.002),
        });
        let d = graph.add_node(RoadNode {
            osm_id: 4,
            geometry: Point::new(-122.001, 37.001),
        });
        let e = graph.add_node(RoadNode {
            osm_id: 5,
            geometry: Point::new(-121.900, 37.100),
        });

        // Slow direct: 220 m at ~30 km/h
        for (from, to) in [(a, b), (b, a), (b, c), (c, b)] {
            graph.add_edge(from, to, edge(110.0, 8.33));
        }
        // Fast detour: 290 m at ~100 km/h
        for (from, to) in [(a, d), (d, a), (d, c), (c, d)] {
            graph.add_edge(from, to, edge(145.0, 27.78));
        }

        let nodes = vec![a, b, c, d, e];
        (RoadNetwork::new(graph), nodes)
    }

    #[test]
    fn endpoints_match_the_requested_nodes() {
        let (network, nodes) = diamond();
        let route = shortest_path(&network, nodes[0], nodes[2], Weight::Length).unwrap();
        assert_eq!(route.nodes().first(), Some(&nodes[0]));
        assert_eq!(route.nodes().last(), Some(&nodes[2]));
    }

    #[test]
    fn length_and_time_routes_diverge() {
        let (network, nodes) = diamond();
        let by_length = shortest_path(&network, nodes[0], nodes[2], Weight::Length).unwrap();
        let by_time = shortest_path(&network, nodes[0], nodes[2], Weight::TravelTime).unwrap();

        assert_eq!(by_length.nodes(), &[nodes[0], nodes[1], nodes[2]]);
        assert_eq!(by_time.nodes(), &[nodes[0], nodes[3], nodes[2]]);
    }

    #[test]
    fn length_route_is_never_longer_than_the_time_route() {
        let (network, nodes) = diamond();
        let by_length = shortest_path(&network, nodes[0], nodes[2], Weight::Length).unwrap();
        let by_time = shortest_path(&network, nodes[0], nodes[2], Weight::TravelTime).unwrap();

        let shortest = summarize(&network, Some(&by_length), Weight::Length).unwrap();
        let fastest = summarize(&network, Some(&by_time), Weight::Length).unwrap();
        assert!(shortest <= fastest);
    }

    #[test]
    fn summarize_is_idempotent() {
        let (network, nodes) = diamond();
        let route = shortest_path(&network, nodes[0], nodes[2], Weight::TravelTime).unwrap();
        let first = summarize(&network, Some(&route), Weight::TravelTime).unwrap();
        let second = summarize(&network, Some(&route), Weight::TravelTime).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn disconnected_nodes_report_no_path_for_both_weights() {
        let (network, nodes) = diamond();
        for weight in [Weight::Length, Weight::TravelTime] {
            assert!(matches!(
                shortest_path(&network, nodes[0], nodes[4], weight),
                Err(Error::NoPathFound { .. })
            ));
        }
    }

    #[test]
    fn absent_route_fails_loudly() {
        let (network, _) = diamond();
        assert!(matches!(
            summarize(&network, None, Weight::Length),
            Err(Error::MissingRoute)
        ));
    }

    #[test]
    fn route_over_missing_edges_is_invalid() {
        let (network, nodes) = diamond();
        let bogus = Route {
            nodes: vec![nodes[0], nodes[4]],
        };
        assert!(matches!(
            summarize(&network, Some(&bogus), Weight::Length),
            Err(Error::InvalidRoute)
        ));
    }
}

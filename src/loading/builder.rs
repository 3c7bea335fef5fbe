//! Graph assembly from raw Overpass elements

use geo::{Distance, Haversine, Intersects, Point, Rect};
use hashbrown::HashMap;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};

use super::TravelMode;
use super::overpass::{OsmElement, OverpassResponse};
use super::speed::SpeedTable;
use crate::Error;
use crate::model::{RoadEdge, RoadNetwork, RoadNode};

/// Direction of travel permitted along a way
enum Direction {
    Both,
    Forward,
    Reverse,
}

impl Direction {
    fn from_oneway(tag: Option<&str>) -> Self {
        match tag {
            Some("yes") | Some("1") | Some("true") => Direction::Forward,
            Some("-1") | Some("reverse") => Direction::Reverse,
            _ => Direction::Both,
        }
    }
}

/// Assemble the routable graph from an Overpass element list.
///
/// Consecutive node pairs of every way of the requested mode become
/// directed edges carrying length, speed, and derived travel time.
/// With `truncate_at_boundary`, a segment is kept when at least one of
/// its endpoints lies inside the region; otherwise both must.
pub(crate) fn build_network(
    response: &OverpassResponse,
    region: &Rect<f64>,
    mode: TravelMode,
    truncate_at_boundary: bool,
    speeds: &SpeedTable,
) -> Result<RoadNetwork, Error> {
    let positions = collect_node_positions(&response.elements);
    debug!("collected {} node positions", positions.len());

    let mut graph: DiGraph<RoadNode, RoadEdge> = DiGraph::new();
    let mut indices: HashMap<i64, NodeIndex> = HashMap::with_capacity(positions.len());

    for element in &response.elements {
        if element.element_type != "way" {
            continue;
        }
        let Some(node_ids) = &element.nodes else {
            continue;
        };
        let tags = element.tags.as_ref();
        let Some(highway) = tags.and_then(|t| t.highway.as_deref()) else {
            continue;
        };
        if !mode.allows(highway) {
            continue;
        }

        let direction = Direction::from_oneway(tags.and_then(|t| t.oneway.as_deref()));
        let maxspeed = tags.and_then(|t| t.maxspeed.as_deref());
        let speed = speeds.speed_mps(mode, highway, maxspeed);

        for pair in node_ids.windows(2) {
            let (Some(&from), Some(&to)) = (positions.get(&pair[0]), positions.get(&pair[1]))
            else {
                continue;
            };
            if !keep_segment(region, &from, &to, truncate_at_boundary) {
                continue;
            }

            let length = Haversine.distance(from, to);
            let edge = RoadEdge {
                length,
                speed,
                travel_time: length / speed,
            };

            let a = node_index(&mut graph, &mut indices, pair[0], from);
            let b = node_index(&mut graph, &mut indices, pair[1], to);
            match direction {
                Direction::Both => {
                    graph.add_edge(a, b, edge.clone());
                    graph.add_edge(b, a, edge);
                }
                Direction::Forward => {
                    graph.add_edge(a, b, edge);
                }
                Direction::Reverse => {
                    graph.add_edge(b, a, edge);
                }
            }
        }
    }

    if graph.edge_count() == 0 {
        return Err(Error::EmptyNetwork);
    }
    Ok(RoadNetwork::new(graph))
}

fn collect_node_positions(elements: &[OsmElement]) -> HashMap<i64, Point<f64>> {
    elements
        .iter()
        .filter(|e| e.element_type == "node")
        .filter_map(|e| {
            let (lat, lon) = (e.lat?, e.lon?);
            Some((e.id, Point::new(lon, lat)))
        })
        .collect()
}

fn keep_segment(
    region: &Rect<f64>,
    from: &Point<f64>,
    to: &Point<f64>,
    truncate_at_boundary: bool,
) -> bool {
    let from_inside = from.intersects(region);
    let to_inside = to.intersects(region);
    if truncate_at_boundary {
        from_inside || to_inside
    } else {
        from_inside && to_inside
    }
}

fn node_index(
    graph: &mut DiGraph<RoadNode, RoadEdge>,
    indices: &mut HashMap<i64, NodeIndex>,
    osm_id: i64,
    geometry: Point<f64>,
) -> NodeIndex {
    *indices
        .entry(osm_id)
        .or_insert_with(|| graph.add_node(RoadNode { osm_id, geometry }))
}

//! Year-filtered migration networks.
//!
//! Nodes here are the prefecture display names carried by the records, not
//! numeric codes, because these graphs feed the map renderer directly.

use crate::graph::{DirectedFlowGraph, FlowKind, PlaceNode};
use flownet_core::FlowRecord;
use tracing::{debug, info};

/// Builds the directed network of flows active in a single year.
///
/// A record is admitted when either of its stage years matches; each of
/// its two candidate edges is then gated independently by that stage's own
/// year and by the endpoints differing. Admission adds all three stage
/// nodes up front, so a node whose only record contributed no edge ends up
/// isolated and is pruned after the pass. Every node in the result has
/// degree >= 1.
pub fn build_year_network(records: &[FlowRecord], year: i32) -> DirectedFlowGraph {
    let mut graph = DirectedFlowGraph::new();

    let admitted = records
        .iter()
        .filter(|r| r.year_first_flow == year || r.year_current_flow == year);

    for record in admitted {
        let hometown = graph.ensure_node(PlaceNode::new(
            record.hometown_name_prefecture.clone(),
            record.hometown_lon,
            record.hometown_lat,
        ));
        let first = graph.ensure_node(PlaceNode::new(
            record.first_name_prefecture.clone(),
            record.first_lon,
            record.first_lat,
        ));
        let current = graph.ensure_node(PlaceNode::new(
            record.current_city.clone(),
            record.current_lon,
            record.current_lat,
        ));

        if record.year_first_flow == year
            && record.hometown_name_prefecture != record.first_name_prefecture
        {
            graph.accumulate_edge(hometown, first, None);
        }
        if record.year_current_flow == year
            && record.first_name_prefecture != record.current_city
        {
            graph.accumulate_edge(first, current, None);
        }
    }

    let before = graph.node_count();
    graph.prune_isolates();
    debug!(pruned = before - graph.node_count(), "removed isolated nodes");

    info!(
        year,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built single-year network"
    );
    graph
}

/// Builds the directed network of flows inside an inclusive year range.
///
/// Unlike [`build_year_network`] this keeps isolates, and every edge is
/// tagged [`FlowKind::Within`] when its endpoint names coincide, else
/// [`FlowKind::Inter`], for the renderer. The hometown-to-first edge may
/// be a within-place self-loop; the first-to-current edge is only added
/// when the places differ (an identical pair is a stay, not a move).
pub fn build_geo_network(
    records: &[FlowRecord],
    start_year: i32,
    end_year: i32,
) -> DirectedFlowGraph {
    let mut graph = DirectedFlowGraph::new();

    for record in records {
        let hometown = graph.ensure_node(PlaceNode::new(
            record.hometown_name_prefecture.clone(),
            record.hometown_lon,
            record.hometown_lat,
        ));
        let first = graph.ensure_node(PlaceNode::new(
            record.first_name_prefecture.clone(),
            record.first_lon,
            record.first_lat,
        ));
        let current = graph.ensure_node(PlaceNode::new(
            record.current_city.clone(),
            record.current_lon,
            record.current_lat,
        ));

        if (start_year..=end_year).contains(&record.year_first_flow) {
            let kind = if record.hometown_name_prefecture == record.first_name_prefecture {
                FlowKind::Within
            } else {
                FlowKind::Inter
            };
            graph.accumulate_edge(hometown, first, Some(kind));
        }

        if (start_year..=end_year).contains(&record.year_current_flow)
            && record.first_name_prefecture != record.current_city
        {
            graph.accumulate_edge(first, current, Some(FlowKind::Inter));
        }
    }

    info!(
        start_year,
        end_year,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built geo network"
    );
    graph
}

//! Aggregated graph builders.
//!
//! One pass over the migration-steps table, one weighted edge per distinct
//! resolved (from, to) pair. The undirected variant drops self-loops; the
//! directed variant keeps them as weight-accumulating self-edges.

use crate::graph::{DirectedFlowGraph, PlaceNode, UndirectedFlowGraph};
use flownet_core::{Granularity, LocationResolver, Result, StepRecord};
use tracing::info;

/// Builds the directed aggregated graph at the requested granularity.
///
/// Edge weight on (u, v) equals the number of records whose resolved pair
/// is exactly (u, v). Fails on the first record whose truncated code is
/// missing from the reference tables.
pub fn build_directed(
    steps: &[StepRecord],
    granularity: Granularity,
    resolver: &LocationResolver,
) -> Result<DirectedFlowGraph> {
    let mut graph = DirectedFlowGraph::new();

    for step in steps {
        let from = resolver.resolve(&step.from_code, granularity, (step.from_lon, step.from_lat))?;
        let to = resolver.resolve(&step.to_code, granularity, (step.to_lon, step.to_lat))?;

        let u = graph.ensure_node(PlaceNode::new(from.id, from.lon, from.lat));
        let v = graph.ensure_node(PlaceNode::new(to.id, to.lon, to.lat));
        graph.accumulate_edge(u, v, None);
    }

    info!(
        granularity = %granularity,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built directed aggregated graph"
    );
    Ok(graph)
}

/// Builds the undirected aggregated graph at the requested granularity.
///
/// Records whose endpoints resolve to the same id are skipped entirely,
/// so the graph never contains self-loops. An edge's weight is the total
/// number of flows between its endpoints in both directions.
pub fn build_undirected(
    steps: &[StepRecord],
    granularity: Granularity,
    resolver: &LocationResolver,
) -> Result<UndirectedFlowGraph> {
    let mut graph = UndirectedFlowGraph::new();

    for step in steps {
        let from = resolver.resolve(&step.from_code, granularity, (step.from_lon, step.from_lat))?;
        let to = resolver.resolve(&step.to_code, granularity, (step.to_lon, step.to_lat))?;

        if from.id == to.id {
            continue;
        }

        let u = graph.ensure_node(PlaceNode::new(from.id, from.lon, from.lat));
        let v = graph.ensure_node(PlaceNode::new(to.id, to.lon, to.lat));
        graph.accumulate_edge(u, v, None);
    }

    info!(
        granularity = %granularity,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built undirected aggregated graph"
    );
    Ok(graph)
}

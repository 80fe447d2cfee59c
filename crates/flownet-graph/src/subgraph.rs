//! Temporal subgraph extraction from the attributed multigraph.

use crate::multiflow::MigrationMultiGraph;
use petgraph::visit::EdgeRef;
use tracing::debug;

/// Returns a new multigraph keeping only edges whose year is in `years`.
///
/// Retained edges keep their full attribute payload; nodes are copied with
/// their original attributes, and only nodes incident to at least one
/// retained edge appear. The input graph is untouched, and parallel-edge
/// multiplicity survives exactly.
pub fn year_subgraph(graph: &MigrationMultiGraph, years: &[i32]) -> MigrationMultiGraph {
    let mut filtered = MigrationMultiGraph::new();

    for edge in graph.inner().edge_references() {
        if !years.contains(&edge.weight().year) {
            continue;
        }
        let u = filtered.ensure_node(graph.inner()[edge.source()].clone());
        let v = filtered.ensure_node(graph.inner()[edge.target()].clone());
        filtered.add_transition(u, v, edge.weight().clone());
    }

    debug!(
        years = ?years,
        nodes = filtered.node_count(),
        edges = filtered.edge_count(),
        "extracted year subgraph"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiflow::build_multigraph;
    use flownet_core::FlowRecord;

    fn record(hometown: &str, first: &str, current: &str, y1: i32, y2: i32) -> FlowRecord {
        FlowRecord {
            hometown_code: hometown.to_string(),
            first_flow_code: first.to_string(),
            current_code: current.to_string(),
            hometown_province_code: hometown[..2].to_string(),
            first_flow_province_code: first[..2].to_string(),
            current_province_code: current[..2].to_string(),
            year_first_flow: y1,
            year_current_flow: y2,
            gender: 2,
            edu_level: 4,
            ..FlowRecord::default()
        }
    }

    #[test]
    fn test_only_matching_years_survive() {
        let graph = build_multigraph(&[
            record("110101", "310101", "440101", 2010, 2012),
            record("110101", "310101", "440101", 2011, 2013),
        ])
        .unwrap();

        let filtered = year_subgraph(&graph, &[2010]);

        // Only the first record's hometown -> first leg is from 2010.
        assert_eq!(filtered.edge_count(), 1);
        assert_eq!(filtered.node_count(), 2);
        let legs = filtered.transitions_between("110101", "310101");
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].year, 2010);
        assert!(filtered.get_by_id("440101").is_none());
    }

    #[test]
    fn test_multiplicity_is_preserved() {
        let graph = build_multigraph(&[
            record("110101", "310101", "440101", 2010, 2012),
            record("110101", "310101", "440101", 2010, 2012),
        ])
        .unwrap();

        let filtered = year_subgraph(&graph, &[2010]);
        assert_eq!(filtered.transitions_between("110101", "310101").len(), 2);
    }

    #[test]
    fn test_payload_survives_unchanged() {
        let graph = build_multigraph(&[record("110101", "310101", "440101", 2010, 2012)]).unwrap();
        let filtered = year_subgraph(&graph, &[2012]);

        let original = graph.transitions_between("310101", "440101")[0];
        let kept = filtered.transitions_between("310101", "440101")[0];
        assert_eq!(kept, original);
        assert_eq!(
            *filtered.get_by_id("310101").unwrap(),
            *graph.get_by_id("310101").unwrap()
        );
    }

    #[test]
    fn test_input_graph_untouched() {
        let graph = build_multigraph(&[record("110101", "310101", "440101", 2010, 2012)]).unwrap();
        let nodes = graph.node_count();
        let edges = graph.edge_count();

        let _ = year_subgraph(&graph, &[2010]);

        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn test_empty_year_set_yields_empty_graph() {
        let graph = build_multigraph(&[record("110101", "310101", "440101", 2010, 2012)]).unwrap();
        let filtered = year_subgraph(&graph, &[]);
        assert_eq!(filtered.node_count(), 0);
        assert_eq!(filtered.edge_count(), 0);
    }
}

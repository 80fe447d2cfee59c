//! Fully-attributed multigraph of individual flows.
//!
//! The most granular representation: every trajectory record contributes
//! two edges (hometown to first relocation, first to current residence),
//! each carrying the record's complete attribute payload. Nothing is
//! aggregated here; this graph is the source of truth for fine-grained
//! temporal and attribute filtering.

use crate::graph::NodeId;
use flownet_core::{EducationLevel, FlowRecord, Gender, Result};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Node payload: the full code hierarchy plus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub location_code: String,
    pub province_code: String,
    pub city_code: String,
    pub county_code: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// One individual flow stage with the originating record's attributes.
///
/// `from_attrs`/`to_attrs` are snapshots of the endpoint nodes taken when
/// the edge was created, not live references; node attributes never change
/// after first insertion, so the snapshots stay accurate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEdge {
    pub from_code: String,
    pub to_code: String,
    /// Year this stage's move happened.
    pub year: i32,
    pub month: u8,
    pub gender: Gender,
    pub education_level: EducationLevel,
    pub average_family_cost_per_month: f64,
    pub average_family_income_per_month: f64,
    pub total_flows: u32,
    pub stay_at_destination: bool,
    pub changed_household: bool,
    pub stay_duration_months: u32,
    /// Row index of the source record, for traceability.
    pub flow_index: usize,
    pub from_attrs: NodeAttributes,
    pub to_attrs: NodeAttributes,
}

/// Directed multigraph of individual flow stages.
///
/// Parallel edges between the same pair of places are kept as distinct
/// edge objects, one per contributing record stage.
#[derive(Debug, Clone, Default)]
pub struct MigrationMultiGraph {
    graph: DiGraph<NodeAttributes, TransitionEdge>,
    id_index: HashMap<String, NodeId>,
}

impl MigrationMultiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node only if its location code is absent; first write
    /// wins.
    pub fn ensure_node(&mut self, attrs: NodeAttributes) -> NodeId {
        if let Some(&index) = self.id_index.get(&attrs.location_code) {
            return index;
        }
        let code = attrs.location_code.clone();
        let index = self.graph.add_node(attrs);
        self.id_index.insert(code, index);
        index
    }

    /// Appends a flow-stage edge. Repeated (u, v) pairs stack up as
    /// parallel edges, never merge.
    pub fn add_transition(&mut self, u: NodeId, v: NodeId, edge: TransitionEdge) {
        self.graph.add_edge(u, v, edge);
    }

    pub fn index_of(&self, code: &str) -> Option<NodeId> {
        self.id_index.get(code).copied()
    }

    pub fn get_by_id(&self, code: &str) -> Option<&NodeAttributes> {
        let index = self.id_index.get(code)?;
        self.graph.node_weight(*index)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeAttributes> {
        self.graph.node_weights()
    }

    /// Iterates over all flow-stage edges.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionEdge> {
        self.graph.edge_weights()
    }

    /// All edges between two location codes, in insertion order.
    pub fn transitions_between(&self, u: &str, v: &str) -> Vec<&TransitionEdge> {
        match (self.index_of(u), self.index_of(v)) {
            (Some(u), Some(v)) => self
                .graph
                .edges_connecting(u, v)
                .map(|e| e.weight())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The underlying petgraph graph, for the metrics engine and the
    /// subgraph extractor.
    pub fn inner(&self) -> &DiGraph<NodeAttributes, TransitionEdge> {
        &self.graph
    }
}

fn hometown_attrs(record: &FlowRecord) -> NodeAttributes {
    NodeAttributes {
        location_code: record.hometown_code.clone(),
        province_code: record.hometown_province_code.clone(),
        city_code: record.hometown_city_code.clone(),
        county_code: record.hometown_county_code.clone(),
        longitude: record.hometown_lon,
        latitude: record.hometown_lat,
    }
}

fn first_flow_attrs(record: &FlowRecord) -> NodeAttributes {
    NodeAttributes {
        location_code: record.first_flow_code.clone(),
        province_code: record.first_flow_province_code.clone(),
        city_code: record.first_flow_city_code.clone(),
        county_code: record.first_flow_county_code.clone(),
        longitude: record.first_lon,
        latitude: record.first_lat,
    }
}

fn current_attrs(record: &FlowRecord) -> NodeAttributes {
    NodeAttributes {
        location_code: record.current_code.clone(),
        province_code: record.current_province_code.clone(),
        city_code: record.current_city_code.clone(),
        county_code: record.current_county_code.clone(),
        longitude: record.current_lon,
        latitude: record.current_lat,
    }
}

/// Builds the attributed multigraph from the full trajectory table.
///
/// Every record yields exactly two edges regardless of repetition. Fails
/// on the first record with a demographic code outside the closed
/// enumerations.
pub fn build_multigraph(records: &[FlowRecord]) -> Result<MigrationMultiGraph> {
    let mut graph = MigrationMultiGraph::new();

    for (flow_index, record) in records.iter().enumerate() {
        let hometown = graph.ensure_node(hometown_attrs(record));
        let first = graph.ensure_node(first_flow_attrs(record));
        let current = graph.ensure_node(current_attrs(record));

        let gender = Gender::try_from(record.gender)?;
        let education_level = EducationLevel::try_from(record.edu_level)?;

        let stage = |year, month, from: NodeId, to: NodeId, g: &MigrationMultiGraph| {
            TransitionEdge {
                from_code: g.graph[from].location_code.clone(),
                to_code: g.graph[to].location_code.clone(),
                year,
                month,
                gender,
                education_level,
                average_family_cost_per_month: record.average_family_cost_per_month,
                average_family_income_per_month: record.average_family_income_per_month,
                total_flows: record.num_flows_total,
                stay_at_destination: record.if_stay,
                changed_household: record.if_change_household_local,
                stay_duration_months: record.how_long_to_stay,
                flow_index,
                from_attrs: g.graph[from].clone(),
                to_attrs: g.graph[to].clone(),
            }
        };

        let first_leg = stage(
            record.year_first_flow,
            record.month_first_flow,
            hometown,
            first,
            &graph,
        );
        graph.add_transition(hometown, first, first_leg);

        let second_leg = stage(
            record.year_current_flow,
            record.month_current_flow,
            first,
            current,
            &graph,
        );
        graph.add_transition(first, current, second_leg);
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built attributed multigraph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flownet_core::FlowError;

    fn record(hometown: &str, first: &str, current: &str) -> FlowRecord {
        FlowRecord {
            hometown_code: hometown.to_string(),
            first_flow_code: first.to_string(),
            current_code: current.to_string(),
            hometown_province_code: hometown[..2].to_string(),
            hometown_city_code: hometown[..4].to_string(),
            hometown_county_code: hometown.to_string(),
            first_flow_province_code: first[..2].to_string(),
            first_flow_city_code: first[..4].to_string(),
            first_flow_county_code: first.to_string(),
            current_province_code: current[..2].to_string(),
            current_city_code: current[..4].to_string(),
            current_county_code: current.to_string(),
            year_first_flow: 2010,
            month_first_flow: 3,
            year_current_flow: 2012,
            month_current_flow: 7,
            gender: 1,
            edu_level: 3,
            num_flows_total: 2,
            how_long_to_stay: 12,
            ..FlowRecord::default()
        }
    }

    #[test]
    fn test_every_record_yields_two_edges() {
        let records = vec![
            record("110101", "310101", "440101"),
            record("110101", "310101", "440101"),
            record("110101", "310101", "440101"),
        ];
        let graph = build_multigraph(&records).unwrap();

        // Identical records still stack parallel edges: 2 per record.
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.transitions_between("110101", "310101").len(), 3);
        assert_eq!(graph.transitions_between("310101", "440101").len(), 3);
    }

    #[test]
    fn test_stage_timing_lands_on_the_right_edge() {
        let graph = build_multigraph(&[record("110101", "310101", "440101")]).unwrap();

        let first_leg = graph.transitions_between("110101", "310101")[0];
        assert_eq!(first_leg.year, 2010);
        assert_eq!(first_leg.month, 3);

        let second_leg = graph.transitions_between("310101", "440101")[0];
        assert_eq!(second_leg.year, 2012);
        assert_eq!(second_leg.month, 7);
    }

    #[test]
    fn test_edge_snapshots_endpoint_attributes() {
        let graph = build_multigraph(&[record("110101", "310101", "440101")]).unwrap();

        let leg = graph.transitions_between("110101", "310101")[0];
        assert_eq!(leg.flow_index, 0);
        assert_eq!(leg.from_attrs, *graph.get_by_id("110101").unwrap());
        assert_eq!(leg.to_attrs, *graph.get_by_id("310101").unwrap());
        assert_eq!(leg.from_attrs.province_code, "11");
        assert_eq!(leg.gender, Gender::Female);
        assert_eq!(leg.education_level, EducationLevel::HighSchool);
    }

    #[test]
    fn test_node_attributes_are_first_write_wins() {
        let a = record("110101", "310101", "440101");
        let mut b = record("310101", "440101", "110101");
        // Conflicting coordinates for nodes that already exist.
        b.hometown_lon = 99.0;
        let graph = build_multigraph(&[a, b]).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.get_by_id("310101").unwrap().longitude, 0.0);
    }

    #[test]
    fn test_unknown_demographic_code_aborts() {
        let mut bad = record("110101", "310101", "440101");
        bad.edu_level = 9;
        let err = build_multigraph(&[bad]).unwrap_err();
        assert_eq!(err, FlowError::UnknownEducationLevel(9));
    }

    #[test]
    fn test_stay_at_current_stage_still_adds_edge() {
        // first == current: the multigraph does NOT apply the self-loop
        // rule; the stage is recorded as a self-edge.
        let graph = build_multigraph(&[record("110101", "310101", "310101")]).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.transitions_between("310101", "310101").len(), 1);
    }
}

//! Core graph container.
//!
//! `FlowGraph` wraps petgraph and adds a location-id index plus the two
//! insertion primitives every builder relies on: idempotent node insertion
//! and weight-accumulating edge insertion.

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, EdgeType, Undirected};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// A place (county, prefecture, province, or named city) with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceNode {
    /// Location id at the builder's granularity.
    pub id: String,
    pub lon: f64,
    pub lat: f64,
}

impl PlaceNode {
    pub fn new(id: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
        }
    }

    /// `(lon, lat)` pair for the rendering collaborator.
    pub fn pos(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}

/// Whether a flow stays inside one place or crosses between two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Source and destination coincide.
    Within,
    /// Source and destination differ.
    Inter,
}

/// An aggregated flow edge: how many records contributed this pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub weight: u32,
    /// Set by the geo builder, absent elsewhere.
    pub kind: Option<FlowKind>,
}

/// An edge flattened for export to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FlowKind>,
}

/// The migration flow graph.
///
/// Stores places as nodes and aggregated flows as weighted edges, with an
/// id index for lookups by location code. The `Ty` parameter selects the
/// directed or undirected variant; in the undirected instantiation a
/// single edge object backs both orientations, so
/// `weight(u, v) == weight(v, u)` holds by construction.
#[derive(Debug, Clone)]
pub struct FlowGraph<Ty: EdgeType> {
    graph: Graph<PlaceNode, FlowEdge, Ty>,
    /// Maps location ids to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

/// Aggregated directed variant (self-loops allowed).
pub type DirectedFlowGraph = FlowGraph<Directed>;

/// Aggregated undirected variant (symmetrized, self-loops dropped).
pub type UndirectedFlowGraph = FlowGraph<Undirected>;

impl<Ty: EdgeType> Default for FlowGraph<Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ty: EdgeType> FlowGraph<Ty> {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: Graph::default(),
            id_index: HashMap::new(),
        }
    }

    /// Inserts the node only if its id is absent; first write wins.
    ///
    /// A later record carrying different coordinates for the same id is
    /// discarded, never merged. Returns the node's index either way.
    pub fn ensure_node(&mut self, node: PlaceNode) -> NodeId {
        if let Some(&index) = self.id_index.get(&node.id) {
            return index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.id_index.insert(id, index);
        index
    }

    /// Adds the edge with weight 1, or bumps an existing edge's weight.
    ///
    /// `kind` is only applied on first creation; an existing edge keeps
    /// the kind it was created with.
    pub fn accumulate_edge(&mut self, u: NodeId, v: NodeId, kind: Option<FlowKind>) {
        match self.graph.find_edge(u, v) {
            Some(edge) => self.graph[edge].weight += 1,
            None => {
                self.graph.add_edge(u, v, FlowEdge { weight: 1, kind });
            }
        }
    }

    /// Gets the node index for a location id.
    pub fn index_of(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&PlaceNode> {
        self.graph.node_weight(index)
    }

    /// Gets a node by its location id.
    pub fn get_by_id(&self, id: &str) -> Option<&PlaceNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Aggregated weight between two location ids, if the edge exists.
    /// In the undirected variant the argument order is irrelevant.
    pub fn weight_between(&self, u: &str, v: &str) -> Option<u32> {
        let u = self.index_of(u)?;
        let v = self.index_of(v)?;
        let edge = self.graph.find_edge(u, v)?;
        Some(self.graph[edge].weight)
    }

    /// Edge payload between two location ids.
    pub fn edge_between(&self, u: &str, v: &str) -> Option<&FlowEdge> {
        let u = self.index_of(u)?;
        let v = self.index_of(v)?;
        let edge = self.graph.find_edge(u, v)?;
        Some(&self.graph[edge])
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &PlaceNode> {
        self.graph.node_weights()
    }

    /// Removes every node with no incident edges and reindexes.
    pub fn prune_isolates(&mut self) {
        self.graph
            .retain_nodes(|g, index| g.neighbors_undirected(index).next().is_some());
        self.id_index = self
            .graph
            .node_indices()
            .map(|index| (self.graph[index].id.clone(), index))
            .collect();
    }

    /// Flattens all edges into `(source, target, weight, kind)` rows for
    /// the rendering collaborator.
    pub fn export_edges(&self) -> Vec<ExportedEdge> {
        self.graph
            .edge_references()
            .map(|edge| ExportedEdge {
                source: self.graph[edge.source()].id.clone(),
                target: self.graph[edge.target()].id.clone(),
                weight: edge.weight().weight,
                kind: edge.weight().kind,
            })
            .collect()
    }

    /// The underlying petgraph graph, for the metrics engine.
    pub fn inner(&self) -> &Graph<PlaceNode, FlowEdge, Ty> {
        &self.graph
    }
}

//! Flownet Graph - Migration network construction and analysis
//!
//! This crate turns tables of individual migration trajectories into graph
//! representations and computes aggregate topology over them.
//!
//! # Architecture
//!
//! All builders share one container, [`FlowGraph`], which wraps petgraph
//! and enforces the two construction invariants everything else depends
//! on: node insertion is idempotent (first write wins) and repeated edges
//! accumulate weight instead of duplicating. On top of it sit:
//!
//! - the aggregated builders ([`build_directed`] / [`build_undirected`]),
//!   one weighted edge per distinct resolved pair at a chosen granularity;
//! - the attributed multigraph ([`build_multigraph`]), two fully-attributed
//!   edges per record, never merged, filterable by year with
//!   [`year_subgraph`];
//! - the temporal builders ([`build_year_network`] / [`build_geo_network`]),
//!   restricted to flows active in a year or range;
//! - the metrics engine ([`compute_global_metrics`]), with a
//!   largest-component fallback for disconnected graphs.
//!
//! # Example
//!
//! ```
//! use flownet_core::{GeoTable, Granularity, LocationResolver, StepRecord};
//! use flownet_graph::{build_directed, compute_global_metrics};
//!
//! let resolver = LocationResolver::new(
//!     GeoTable::from_rows("prefecture", [(1101, 116.4, 39.9), (3101, 121.5, 31.2)]),
//!     GeoTable::from_rows("province", [(11, 116.4, 39.9), (31, 121.5, 31.2)]),
//! );
//! let steps = vec![
//!     StepRecord::new("110101", "310104"),
//!     StepRecord::new("110102", "310104"),
//! ];
//!
//! let graph = build_directed(&steps, Granularity::Prefecture, &resolver).unwrap();
//! assert_eq!(graph.weight_between("1101", "3101"), Some(2));
//!
//! let metrics = compute_global_metrics(graph.inner()).unwrap();
//! assert_eq!(metrics.n_nodes, 2);
//! ```

mod builder;
mod graph;
mod metrics;
mod multiflow;
mod subgraph;
mod temporal;

pub use builder::{build_directed, build_undirected};
pub use graph::{
    DirectedFlowGraph, ExportedEdge, FlowEdge, FlowGraph, FlowKind, NodeId, PlaceNode,
    UndirectedFlowGraph,
};
pub use metrics::{compute_global_metrics, GlobalMetrics};
pub use multiflow::{build_multigraph, MigrationMultiGraph, NodeAttributes, TransitionEdge};
pub use subgraph::year_subgraph;
pub use temporal::{build_geo_network, build_year_network};

//! Global topology metrics.
//!
//! Works on any constructed graph (directed, undirected, or multigraph).
//! Degree, path, clustering, and assortativity measures are taken on a
//! simple undirected view: reciprocal and parallel edges merge, and
//! direction is discarded. Path measures fall back to the largest
//! connected component when the view is disconnected, with the component's
//! node fraction reported so callers can tell the two cases apart.

use flownet_core::{FlowError, Result};
use petgraph::graph::Graph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Global topological statistics of one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub n_nodes: usize,
    pub n_edges: usize,
    /// Edge count over the possible edge count, respecting directedness.
    pub density: f64,
    pub avg_degree: f64,
    pub max_degree: usize,
    /// Mean shortest-path length over the (largest component of the)
    /// undirected view.
    pub avg_path_length: f64,
    /// Maximum eccentricity over the same node set.
    pub diameter: usize,
    /// Fraction of nodes in the largest connected component. Present only
    /// when the graph is disconnected; check for the key rather than
    /// assuming a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcc_fraction: Option<f64>,
    pub avg_clustering: f64,
    pub transitivity: f64,
    /// Pearson degree correlation; NaN for degree-regular graphs.
    pub assortativity: f64,
}

/// Simple undirected view of an arbitrary graph, indexed by position.
struct UndirectedView {
    /// Neighbor sets, self-loops excluded.
    adj: Vec<HashSet<usize>>,
    /// Nodes carrying at least one self-loop (counts 2 toward degree).
    self_loop: Vec<bool>,
}

impl UndirectedView {
    fn build<N, E, Ty: EdgeType>(graph: &Graph<N, E, Ty>) -> Self {
        let n = graph.node_count();
        let mut adj = vec![HashSet::new(); n];
        let mut self_loop = vec![false; n];

        for edge in graph.edge_references() {
            let a = edge.source().index();
            let b = edge.target().index();
            if a == b {
                self_loop[a] = true;
            } else {
                adj[a].insert(b);
                adj[b].insert(a);
            }
        }
        Self { adj, self_loop }
    }

    fn degree(&self, node: usize) -> usize {
        self.adj[node].len() + if self.self_loop[node] { 2 } else { 0 }
    }

    /// Connected components as lists of node positions, largest first.
    fn components(&self) -> Vec<Vec<usize>> {
        let n = self.adj.len();
        let mut union = UnionFind::new(n);
        for (a, neighbors) in self.adj.iter().enumerate() {
            for &b in neighbors {
                union.union(a, b);
            }
        }

        let labels = union.into_labeling();
        let mut by_label: std::collections::HashMap<usize, Vec<usize>> =
            std::collections::HashMap::new();
        for (node, label) in labels.into_iter().enumerate() {
            by_label.entry(label).or_default().push(node);
        }

        let mut components: Vec<Vec<usize>> = by_label.into_values().collect();
        components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));
        components
    }

    /// BFS distances from `start` to every reachable node.
    fn bfs(&self, start: usize) -> Vec<(usize, usize)> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut reached = Vec::new();

        while let Some((node, dist)) = queue.pop_front() {
            if node != start {
                reached.push((node, dist));
            }
            for &next in &self.adj[node] {
                if seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        reached
    }

    /// Edges among the neighbors of `node`.
    fn links_between_neighbors(&self, node: usize) -> usize {
        let neighbors = &self.adj[node];
        neighbors
            .iter()
            .map(|&u| neighbors.iter().filter(|&&w| u < w && self.adj[u].contains(&w)).count())
            .sum()
    }
}

/// Computes the global metrics report for any graph.
///
/// Fails on graphs with fewer than 2 nodes, or whose largest connected
/// component has fewer than 2 (no path or diameter is defined there).
pub fn compute_global_metrics<N, E, Ty: EdgeType>(graph: &Graph<N, E, Ty>) -> Result<GlobalMetrics> {
    let n = graph.node_count();
    if n < 2 {
        return Err(FlowError::DegenerateGraph { nodes: n });
    }
    let m = graph.edge_count();

    let possible_pairs = (n * (n - 1)) as f64;
    let density = if graph.is_directed() {
        m as f64 / possible_pairs
    } else {
        2.0 * m as f64 / possible_pairs
    };

    let view = UndirectedView::build(graph);

    let degrees: Vec<usize> = (0..n).map(|node| view.degree(node)).collect();
    let avg_degree = degrees.iter().sum::<usize>() as f64 / n as f64;
    let max_degree = degrees.iter().copied().max().unwrap_or(0);

    let components = view.components();
    let largest = &components[0];
    let lcc_fraction = if largest.len() == n {
        None
    } else {
        Some(largest.len() as f64 / n as f64)
    };
    if largest.len() < 2 {
        return Err(FlowError::DegenerateGraph {
            nodes: largest.len(),
        });
    }

    // Path length and diameter over the largest component only.
    let mut distance_sum = 0usize;
    let mut distance_count = 0usize;
    let mut diameter = 0usize;
    for &start in largest {
        for (_, dist) in view.bfs(start) {
            distance_sum += dist;
            distance_count += 1;
            diameter = diameter.max(dist);
        }
    }
    let avg_path_length = distance_sum as f64 / distance_count as f64;

    // Clustering and transitivity over the whole view.
    let mut clustering_sum = 0.0;
    let mut closed_triples = 0usize;
    let mut triples = 0usize;
    for node in 0..n {
        let k = view.adj[node].len();
        let links = view.links_between_neighbors(node);
        if k >= 2 {
            clustering_sum += 2.0 * links as f64 / (k * (k - 1)) as f64;
            triples += k * (k - 1) / 2;
        }
        closed_triples += links;
    }
    let avg_clustering = clustering_sum / n as f64;
    let transitivity = if triples == 0 {
        0.0
    } else {
        closed_triples as f64 / triples as f64
    };

    let assortativity = degree_assortativity(&view, &degrees);

    Ok(GlobalMetrics {
        n_nodes: n,
        n_edges: m,
        density,
        avg_degree,
        max_degree,
        avg_path_length,
        diameter,
        lcc_fraction,
        avg_clustering,
        transitivity,
        assortativity,
    })
}

/// Pearson correlation of the degrees at either end of each undirected
/// edge. Self-loops are excluded from the edge sum.
fn degree_assortativity(view: &UndirectedView, degrees: &[usize]) -> f64 {
    let mut m = 0.0;
    let mut sum_product = 0.0;
    let mut sum_mean = 0.0;
    let mut sum_square = 0.0;

    for (a, neighbors) in view.adj.iter().enumerate() {
        for &b in neighbors {
            if a < b {
                let (j, k) = (degrees[a] as f64, degrees[b] as f64);
                m += 1.0;
                sum_product += j * k;
                sum_mean += (j + k) / 2.0;
                sum_square += (j * j + k * k) / 2.0;
            }
        }
    }

    if m == 0.0 {
        return f64::NAN;
    }
    let mean = sum_mean / m;
    let numerator = sum_product / m - mean * mean;
    let denominator = sum_square / m - mean * mean;
    numerator / denominator
}

//! Forward-star (compressed sparse row) weighted adjacency graph: the
//! topology the coarsening, partitioning, and refinement operators all
//! share.

/// Node identifier, dense in `0..graph.num_nodes()`.
pub type NodeId = usize;

/// Part (partition) identifier, dense in `0..num_parts`.
pub type PartId = usize;

/// Edge and node weight. Integral rather than floating point: every
/// weight in this crate counts something (particles in a cell, merged
/// node multiplicity), and integral weights make partition-weight
/// comparisons and disbalance caps exact rather than epsilon-sensitive.
pub type Weight = i64;

/// Sentinel "no node/part assigned yet" value, matching the convention
/// used throughout the geometric layer's index permutations.
pub const NPOS: usize = usize::MAX;

/// A weighted graph in forward-star layout: `offsets` delimits each
/// node's row in the flat `neighbors`/`edge_weights` buffers.
#[derive(Clone, Debug, Default)]
pub struct WeightedGraph {
    offsets: Vec<usize>,
    neighbors: Vec<NodeId>,
    edge_weights: Vec<Weight>,
    node_weights: Vec<Weight>,
}

impl WeightedGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            neighbors: Vec::new(),
            edge_weights: Vec::new(),
            node_weights: Vec::new(),
        }
    }

    /// Discard every node and edge, keeping buffer capacity for reuse.
    pub fn clear(&mut self) {
        self.offsets.clear();
        self.offsets.push(0);
        self.neighbors.clear();
        self.edge_weights.clear();
        self.node_weights.clear();
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.node_weights.len()
    }

    /// The node identifiers `0..num_nodes()`.
    pub fn nodes(&self) -> std::ops::Range<NodeId> {
        0..self.num_nodes()
    }

    /// Weight of `node`.
    pub fn weight(&self, node: NodeId) -> Weight {
        self.node_weights[node]
    }

    /// Every node paired with its weight.
    pub fn wnodes(&self) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.nodes().map(move |n| (n, self.weight(n)))
    }

    /// Neighbors of `node`, each exactly once per adjacency entry (a
    /// symmetric edge appears once in each endpoint's row).
    pub fn edges(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let row = self.offsets[node]..self.offsets[node + 1];
        self.neighbors[row].iter().copied()
    }

    /// Like [`WeightedGraph::edges`], paired with each edge's weight.
    pub fn wedges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        let row = self.offsets[node]..self.offsets[node + 1];
        self.neighbors[row.clone()]
            .iter()
            .copied()
            .zip(self.edge_weights[row].iter().copied())
    }

    /// Every undirected edge exactly once, as `(lesser_node, greater_node)`.
    pub fn unique_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes()
            .flat_map(move |node| self.edges(node).filter(move |&neighbor| neighbor < node).map(move |neighbor| (neighbor, node)))
    }

    /// Like [`WeightedGraph::unique_edges`], paired with each edge's weight.
    pub fn unique_wedges(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        self.nodes().flat_map(move |node| {
            self.wedges(node)
                .filter(move |&(neighbor, _)| neighbor < node)
                .map(move |(neighbor, weight)| (neighbor, node, weight))
        })
    }

    /// Append a new node of the given `weight`, with the given
    /// `(neighbor, edge_weight)` adjacency. `neighbor` entries equal to
    /// the node being appended (self-loops, which can arise when
    /// coarsening merges two fine nodes that were connected to each
    /// other) are dropped: a node is never its own neighbor here.
    pub fn append_node(&mut self, weight: Weight, neighbors: &[(NodeId, Weight)]) {
        let this_node = self.num_nodes();
        for &(neighbor, edge_weight) in neighbors {
            if neighbor == this_node {
                continue;
            }
            self.neighbors.push(neighbor);
            self.edge_weights.push(edge_weight);
        }
        self.offsets.push(self.neighbors.len());
        self.node_weights.push(weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> WeightedGraph {
        // 0 - 1 - 2 - 0, unit node and edge weights.
        let mut g = WeightedGraph::new();
        g.append_node(1, &[(1, 1), (2, 1)]);
        g.append_node(1, &[(0, 1), (2, 1)]);
        g.append_node(1, &[(0, 1), (1, 1)]);
        g
    }

    #[test]
    fn unique_edges_counts_each_edge_once() {
        let g = triangle();
        let edges: Vec<_> = g.unique_edges().collect();
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn append_node_drops_self_loops() {
        let mut g = WeightedGraph::new();
        g.append_node(2, &[(0, 5)]);
        assert_eq!(g.edges(0).count(), 0);
    }

    #[test]
    fn wnodes_pairs_every_node_with_its_weight() {
        let g = triangle();
        let weights: Vec<_> = g.wnodes().map(|(_, w)| w).collect();
        assert_eq!(weights, vec![1, 1, 1]);
    }
}

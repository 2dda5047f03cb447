//! Small cross-cutting graph utilities shared by the partitioning and
//! refinement operators.

use super::weighted::{NodeId, PartId, Weight, WeightedGraph, NPOS};

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Label every node satisfying `active` with its connected-component
/// index within the subgraph induced by `active` nodes (edges are only
/// followed when both endpoints are active); inactive nodes get
/// [`NPOS`]. Returns the number of components found.
pub fn connected_components(graph: &WeightedGraph, active: impl Fn(NodeId) -> bool, components: &mut [PartId]) -> usize {
    assert_eq!(components.len(), graph.num_nodes());

    let mut uf = UnionFind::new(graph.num_nodes());
    for (u, v) in graph.unique_edges() {
        if active(u) && active(v) {
            uf.union(u, v);
        }
    }

    let mut labels = vec![NPOS; graph.num_nodes()];
    let mut next_label = 0usize;
    for node in graph.nodes() {
        if !active(node) {
            components[node] = NPOS;
            continue;
        }
        let root = uf.find(node);
        if labels[root] == NPOS {
            labels[root] = next_label;
            next_label += 1;
        }
        components[node] = labels[root];
    }
    next_label
}

/// Total weight of edges crossing between differently-labeled parts.
pub fn edge_cut(graph: &WeightedGraph, parts: &[PartId]) -> Weight {
    graph.unique_wedges().filter(|&(u, v, _)| parts[u] != parts[v]).map(|(_, _, w)| w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> WeightedGraph {
        // 0-1-2 triangle, 3-4-5 triangle, disconnected from each other.
        let mut g = WeightedGraph::new();
        g.append_node(1, &[(1, 1), (2, 1)]);
        g.append_node(1, &[(0, 1), (2, 1)]);
        g.append_node(1, &[(0, 1), (1, 1)]);
        g.append_node(1, &[(4, 1), (5, 1)]);
        g.append_node(1, &[(3, 1), (5, 1)]);
        g.append_node(1, &[(3, 1), (4, 1)]);
        g
    }

    #[test]
    fn finds_two_components() {
        let g = two_triangles();
        let mut components = vec![NPOS; g.num_nodes()];
        let count = connected_components(&g, |_| true, &mut components);
        assert_eq!(count, 2);
        assert_eq!(components[0], components[1]);
        assert_eq!(components[1], components[2]);
        assert_eq!(components[3], components[4]);
        assert_eq!(components[4], components[5]);
        assert_ne!(components[0], components[3]);
    }

    #[test]
    fn inactive_nodes_are_excluded() {
        let g = two_triangles();
        let mut components = vec![NPOS; g.num_nodes()];
        let count = connected_components(&g, |n| n != 1, &mut components);
        // Removing node 1 leaves 0 and 2 connected directly via their shared
        // edge, plus the untouched 3-4-5 triangle.
        assert_eq!(count, 2);
        assert_eq!(components[1], NPOS);
    }

    #[test]
    fn edge_cut_counts_only_crossing_edges() {
        let g = two_triangles();
        let parts = [0, 0, 0, 1, 1, 1];
        assert_eq!(edge_cut(&g, &parts), 0);

        let parts = [0, 1, 0, 1, 1, 1];
        assert_eq!(edge_cut(&g, &parts), 2);
    }
}

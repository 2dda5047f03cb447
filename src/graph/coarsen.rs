//! Graph coarsening: collapse matched node pairs into coarse nodes,
//! producing a smaller graph with the same approximate connectivity.
//!
//! Two matching strategies are provided. Heavy-edge matching visits nodes
//! lightest-first and greedily matches each to its best unmatched
//! neighbor; greedy-edge matching instead visits edges heaviest-first and
//! matches whichever endpoints are still free. Both feed the same
//! [`build_coarse_graph`] accumulation step.

use std::collections::HashMap;

use crate::rand::{randomized_hash, randomized_hash_unordered};

use super::weighted::{NodeId, Weight, WeightedGraph, NPOS};

/// Collapse `fine` into a coarse graph using heavy-edge matching: nodes
/// are visited in ascending weight order (ties broken by a deterministic
/// hash of the node id) and each unmatched node is paired with whichever
/// unmatched neighbor maximizes `(edge_weight, neighbor_weight, hash)`.
///
/// Returns `(coarse_graph, coarse_to_fine, fine_to_coarse)`, where
/// `coarse_to_fine[c]` lists the fine nodes merged into coarse node `c`
/// in merge order, and `fine_to_coarse[f]` is the coarse node fine node
/// `f` was merged into.
pub fn coarsen_hem(fine: &WeightedGraph) -> (WeightedGraph, Vec<NodeId>, Vec<NodeId>) {
    let mut order: Vec<NodeId> = fine.nodes().collect();
    order.sort_by_key(|&n| (fine.weight(n), randomized_hash(n as u64)));

    let mut fine_to_coarse = vec![NPOS; fine.num_nodes()];
    let mut coarse_to_fine = Vec::with_capacity(fine.num_nodes());
    let mut coarse_node = 0usize;

    for &node in &order {
        if fine_to_coarse[node] != NPOS {
            continue;
        }
        fine_to_coarse[node] = coarse_node;
        coarse_to_fine.push(node);

        let mut best_neighbor = NPOS;
        let mut best_key = (Weight::MIN, Weight::MIN, 0u64);
        for (neighbor, edge_weight) in fine.wedges(node) {
            if fine_to_coarse[neighbor] != NPOS {
                continue;
            }
            let key = (edge_weight, fine.weight(neighbor), randomized_hash(neighbor as u64));
            if best_neighbor == NPOS || key > best_key {
                best_neighbor = neighbor;
                best_key = key;
            }
        }
        if best_neighbor != NPOS {
            fine_to_coarse[best_neighbor] = coarse_node;
            coarse_to_fine.push(best_neighbor);
        }

        coarse_node += 1;
    }

    let coarse = build_coarse_graph(fine, &coarse_to_fine, &fine_to_coarse);
    (coarse, coarse_to_fine, fine_to_coarse)
}

/// Collapse `fine` into a coarse graph using greedy-edge matching: edges
/// are visited heaviest-first (ties broken by the lighter endpoint's
/// weight, then by a hash of the unordered pair) and greedily matched
/// whenever both endpoints are still free. Any node left unmatched after
/// every edge has been considered becomes a singleton coarse node.
///
/// Returns the same `(coarse_graph, coarse_to_fine, fine_to_coarse)`
/// shape as [`coarsen_hem`].
pub fn coarsen_gem(fine: &WeightedGraph) -> (WeightedGraph, Vec<NodeId>, Vec<NodeId>) {
    let mut edges: Vec<(NodeId, NodeId, Weight)> = fine.unique_wedges().collect();
    edges.sort_by_key(|&(u, v, w)| {
        let key = (w, fine.weight(u).min(fine.weight(v)), randomized_hash_unordered([u as u64, v as u64]));
        std::cmp::Reverse(key)
    });

    let mut fine_to_coarse = vec![NPOS; fine.num_nodes()];
    let mut coarse_to_fine = Vec::with_capacity(fine.num_nodes());
    let mut coarse_node = 0usize;

    for (u, v, _) in edges {
        if fine_to_coarse[u] != NPOS || fine_to_coarse[v] != NPOS {
            continue;
        }
        fine_to_coarse[u] = coarse_node;
        fine_to_coarse[v] = coarse_node;
        coarse_to_fine.push(u);
        coarse_to_fine.push(v);
        coarse_node += 1;
    }

    for node in fine.nodes() {
        if fine_to_coarse[node] != NPOS {
            continue;
        }
        fine_to_coarse[node] = coarse_node;
        coarse_to_fine.push(node);
        coarse_node += 1;
    }

    let coarse = build_coarse_graph(fine, &coarse_to_fine, &fine_to_coarse);
    (coarse, coarse_to_fine, fine_to_coarse)
}

/// Build a coarse graph from a fine graph and a fine-to-coarse node
/// mapping. `coarse_to_fine` must list the fine nodes grouped
/// contiguously by the coarse node `fine_to_coarse` maps them to, in
/// ascending coarse-node order (exactly the shape [`coarsen_hem`] and
/// [`coarsen_gem`] produce).
fn build_coarse_graph(fine: &WeightedGraph, coarse_to_fine: &[NodeId], fine_to_coarse: &[NodeId]) -> WeightedGraph {
    let mut coarse = WeightedGraph::new();
    let mut i = 0;
    while i < coarse_to_fine.len() {
        let coarse_id = fine_to_coarse[coarse_to_fine[i]];
        let mut j = i + 1;
        while j < coarse_to_fine.len() && fine_to_coarse[coarse_to_fine[j]] == coarse_id {
            j += 1;
        }
        let group = &coarse_to_fine[i..j];

        let mut coarse_weight = 0;
        let mut neighbor_weights: HashMap<NodeId, Weight> = HashMap::new();
        for &node in group {
            coarse_weight += fine.weight(node);
            for (neighbor, edge_weight) in fine.wedges(node) {
                *neighbor_weights.entry(fine_to_coarse[neighbor]).or_insert(0) += edge_weight;
            }
        }

        let neighbors: Vec<(NodeId, Weight)> = neighbor_weights.into_iter().collect();
        coarse.append_node(coarse_weight, &neighbors);
        i = j;
    }
    coarse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of_four() -> WeightedGraph {
        // 0 - 1 - 2 - 3, unit weights throughout.
        let mut g = WeightedGraph::new();
        g.append_node(1, &[(1, 1)]);
        g.append_node(1, &[(0, 1), (2, 1)]);
        g.append_node(1, &[(1, 1), (3, 1)]);
        g.append_node(1, &[(2, 1)]);
        g
    }

    #[test]
    fn hem_halves_node_count_on_a_path() {
        let g = path_of_four();
        let (coarse, _, fine_to_coarse) = coarsen_hem(&g);
        assert_eq!(coarse.num_nodes(), 2);
        assert_eq!(fine_to_coarse.len(), 4);
        let total_weight: Weight = coarse.wnodes().map(|(_, w)| w).sum();
        assert_eq!(total_weight, 4);
    }

    #[test]
    fn gem_halves_node_count_on_a_path() {
        let g = path_of_four();
        let (coarse, _, fine_to_coarse) = coarsen_gem(&g);
        assert_eq!(coarse.num_nodes(), 2);
        assert_eq!(fine_to_coarse.len(), 4);
    }

    #[test]
    fn coarsening_preserves_total_node_weight() {
        let g = path_of_four();
        let fine_total: Weight = g.wnodes().map(|(_, w)| w).sum();

        let (coarse_hem, ..) = coarsen_hem(&g);
        assert_eq!(coarse_hem.wnodes().map(|(_, w)| w).sum::<Weight>(), fine_total);

        let (coarse_gem, ..) = coarsen_gem(&g);
        assert_eq!(coarse_gem.wnodes().map(|(_, w)| w).sum::<Weight>(), fine_total);
    }
}

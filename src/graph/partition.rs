//! Graph partitioning: a greedy seed-and-grow partitioner usable on its
//! own, and a multilevel wrapper that coarsens first and partitions the
//! much smaller coarse graph instead.

use std::collections::VecDeque;

use crate::rand::randomized_hash;

use super::coarsen::coarsen_gem;
use super::refine::refine_parts_fm_default;
use super::utils::{connected_components, edge_cut};
use super::weighted::{NodeId, PartId, Weight, WeightedGraph, NPOS};

/// Partition `graph` into `num_parts` roughly equal-weight parts by
/// repeated seed-and-grow: pick the lightest currently-unassigned
/// connected component, seed it at the node with the best
/// `(gain, node_weight)`, then breadth-first grow the current part from
/// that seed until its weight reaches a cap derived from the remaining
/// unassigned weight and part count. Finishes with an FM refinement pass.
pub fn greedy_partition(graph: &WeightedGraph, parts: &mut [PartId], num_parts: usize) {
    assert!(num_parts > 0);
    assert!(num_parts <= graph.num_nodes());
    assert_eq!(parts.len(), graph.num_nodes());

    for p in parts.iter_mut() {
        *p = NPOS;
    }

    let mut remaining_weight: Weight = graph.wnodes().map(|(_, w)| w).sum();
    let mut remaining_parts = num_parts;
    let mut part_weight_cap = remaining_weight / remaining_parts as Weight;

    let mut part_weights = vec![0 as Weight; num_parts];
    let mut part = 0usize;

    loop {
        let mut components = vec![NPOS; graph.num_nodes()];
        let num_components = connected_components(graph, |n| parts[n] == NPOS, &mut components);
        if num_components == 0 {
            break;
        }

        let mut component_weights = vec![0 as Weight; num_components];
        for (node, weight) in graph.wnodes() {
            let c = components[node];
            if c != NPOS {
                component_weights[c] += weight;
            }
        }
        let lightest_component = component_weights
            .iter()
            .enumerate()
            .min_by_key(|&(_, &w)| w)
            .map(|(i, _)| i)
            .expect("at least one component when num_components > 0");

        if part_weights[part] >= part_weight_cap && remaining_parts > 1 {
            remaining_weight -= part_weights[part];
            remaining_parts -= 1;
            part_weight_cap = remaining_weight / remaining_parts as Weight;
            part += 1;
        }

        let seed_node = graph
            .nodes()
            .filter(|&n| components[n] == lightest_component)
            .max_by_key(|&n| {
                let gain: Weight = graph
                    .wedges(n)
                    .map(|(neighbor, w)| if parts[neighbor] == NPOS { -w } else { w })
                    .sum();
                (gain, std::cmp::Reverse(graph.weight(n)), randomized_hash(n as u64))
            })
            .expect("lightest component is non-empty");

        parts[seed_node] = part;
        part_weights[part] += graph.weight(seed_node);

        let mut frontier: VecDeque<NodeId> = VecDeque::new();
        frontier.push_back(seed_node);
        while let Some(node) = frontier.pop_front() {
            if part_weights[part] >= part_weight_cap {
                break;
            }
            let before = frontier.len();
            for neighbor in graph.edges(node) {
                if parts[neighbor] != NPOS {
                    continue;
                }
                parts[neighbor] = part;
                part_weights[part] += graph.weight(neighbor);
                frontier.push_back(neighbor);
                if part_weights[part] >= part_weight_cap {
                    break;
                }
            }
            // Sort just the nodes admitted by this expansion so the next
            // pops continue growing the most compact wavefront first.
            let mut newly_admitted: Vec<NodeId> = frontier.drain(before..).collect();
            newly_admitted.sort_by_key(|&n| {
                let mut internal = 0 as Weight;
                let mut external = 0 as Weight;
                for (neighbor, edge_weight) in graph.wedges(n) {
                    if parts[neighbor] == part {
                        internal += edge_weight;
                    } else {
                        external += edge_weight;
                    }
                }
                std::cmp::Reverse((internal - external, -graph.weight(n)))
            });
            frontier.extend(newly_admitted);
        }
    }

    refine_parts_fm_default(graph, parts, num_parts);
    tracing::debug!(edge_cut = edge_cut(graph, parts), num_parts, "greedy partition complete");
}

/// Contraction continues while the fine graph has at least `15 *
/// num_parts` nodes and coarsening still shrinks it to at most 80% of
/// its previous size; past that point partitioning the fine graph
/// directly is cheap enough, and further coarsening buys little.
const MIN_NODES_PER_PART_FOR_COARSENING: usize = 15;
const CONTRACTION_NUMERATOR: usize = 8;
const CONTRACTION_DENOMINATOR: usize = 10;

/// Partition `graph` into `num_parts` parts by recursively coarsening
/// with greedy-edge matching until the graph is small enough, greedily
/// partitioning the coarsest level, then projecting parts back up and
/// running FM refinement at each level on the way.
pub fn multilevel_partition(graph: &WeightedGraph, parts: &mut [PartId], num_parts: usize) {
    assert!(num_parts > 0);
    assert!(num_parts <= graph.num_nodes());
    assert_eq!(parts.len(), graph.num_nodes());
    multilevel_step(graph, parts, num_parts);
}

fn multilevel_step(graph: &WeightedGraph, parts: &mut [PartId], num_parts: usize) {
    let should_coarsen = graph.num_nodes() >= MIN_NODES_PER_PART_FOR_COARSENING * num_parts;
    if should_coarsen {
        let (coarse_graph, _coarse_to_fine, fine_to_coarse) = coarsen_gem(graph);
        let contracted_enough = coarse_graph.num_nodes() * CONTRACTION_DENOMINATOR <= graph.num_nodes() * CONTRACTION_NUMERATOR;
        if contracted_enough {
            let mut coarse_parts = vec![0usize; coarse_graph.num_nodes()];
            multilevel_step(&coarse_graph, &mut coarse_parts, num_parts);

            for node in graph.nodes() {
                parts[node] = coarse_parts[fine_to_coarse[node]];
            }
            refine_parts_fm_default(graph, parts, num_parts);
            return;
        }
    }
    greedy_partition(graph, parts, num_parts);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_graph(n: usize) -> WeightedGraph {
        // An n x n grid graph, unit node and edge weights.
        let mut g = WeightedGraph::new();
        for y in 0..n {
            for x in 0..n {
                let mut neighbors = Vec::new();
                if x > 0 {
                    neighbors.push((y * n + x - 1, 1));
                }
                if x + 1 < n {
                    neighbors.push((y * n + x + 1, 1));
                }
                if y > 0 {
                    neighbors.push(((y - 1) * n + x, 1));
                }
                if y + 1 < n {
                    neighbors.push(((y + 1) * n + x, 1));
                }
                g.append_node(1, &neighbors);
            }
        }
        g
    }

    #[test]
    fn greedy_partition_assigns_every_node() {
        let g = grid_graph(6);
        let mut parts = vec![NPOS; g.num_nodes()];
        greedy_partition(&g, &mut parts, 3);
        assert!(parts.iter().all(|&p| p < 3));
    }

    #[test]
    fn greedy_partition_keeps_parts_roughly_balanced() {
        let g = grid_graph(8);
        let mut parts = vec![NPOS; g.num_nodes()];
        greedy_partition(&g, &mut parts, 4);
        let mut weights = vec![0 as Weight; 4];
        for (node, weight) in g.wnodes() {
            weights[parts[node]] += weight;
        }
        let average = g.num_nodes() as Weight / 4;
        for w in weights {
            assert!((w - average).abs() <= average, "part weight {w} far from average {average}");
        }
    }

    #[test]
    fn multilevel_partition_assigns_every_node() {
        let g = grid_graph(20);
        let mut parts = vec![NPOS; g.num_nodes()];
        multilevel_partition(&g, &mut parts, 4);
        assert!(parts.iter().all(|&p| p < 4));
    }
}

//! Fiduccia-Mattheyses-style partition refinement: repeatedly move
//! boundary nodes to whichever neighboring part most improves the edge
//! cut, subject to a weight-disbalance cap, rolling back to the best
//! total gain seen within each outer iteration.

use std::collections::BinaryHeap;

use crate::rand::randomized_hash;

use super::weighted::{NodeId, PartId, Weight, WeightedGraph};

/// Default maximum allowed part-weight disbalance, in percent above the
/// average part weight.
pub const DEFAULT_MAX_DISBALANCE_PERCENT: Weight = 3;

/// Default cap on refinement passes; each pass touches every boundary
/// node at most once.
pub const DEFAULT_MAX_ITER: usize = 20;

/// A priority queue over node ids keyed by a `Weight` priority, supporting
/// re-priority and removal by lazy invalidation: [`GainQueue::erase`] and
/// repeated [`GainQueue::emplace`] just record the node's latest key, and
/// [`GainQueue::pop`] discards any heap entry that no longer matches it.
struct GainQueue {
    heap: BinaryHeap<(Weight, u64, NodeId)>,
    current: Vec<Option<(Weight, u64)>>,
}

impl GainQueue {
    fn new(num_nodes: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            current: vec![None; num_nodes],
        }
    }

    fn emplace(&mut self, node: NodeId, priority: Weight) {
        let key = (priority, randomized_hash(node as u64));
        self.current[node] = Some(key);
        self.heap.push((key.0, key.1, node));
    }

    fn erase(&mut self, node: NodeId) {
        self.current[node] = None;
    }

    fn pop(&mut self) -> Option<NodeId> {
        while let Some((priority, hash, node)) = self.heap.pop() {
            if self.current[node] == Some((priority, hash)) {
                self.current[node] = None;
                return Some(node);
            }
        }
        None
    }
}

fn is_internal(graph: &WeightedGraph, parts: &[PartId], node: NodeId) -> bool {
    graph.edges(node).all(|neighbor| parts[neighbor] == parts[node])
}

/// How much moving `node` out of its current part could reduce the edge
/// cut by: the heaviest external degree to any single other part, minus
/// the degree internal to its current part. Positive for a good
/// refinement candidate, negative or zero for a node that is cheap to
/// leave alone.
fn compute_priority(graph: &WeightedGraph, parts: &[PartId], num_parts: usize, node: NodeId) -> Weight {
    let mut degree_by_part = vec![0 as Weight; num_parts];
    for (neighbor, edge_weight) in graph.wedges(node) {
        degree_by_part[parts[neighbor]] += edge_weight;
    }
    let internal_degree = degree_by_part[parts[node]];
    let max_external_degree = degree_by_part
        .iter()
        .enumerate()
        .filter(|&(part, _)| part != parts[node])
        .map(|(_, &w)| w)
        .max()
        .unwrap_or(0);
    max_external_degree - internal_degree
}

/// Change in edge cut from moving `node` from its current part to `to_part`.
fn compute_gain(graph: &WeightedGraph, parts: &[PartId], node: NodeId, to_part: PartId) -> Weight {
    let from_part = parts[node];
    let mut gain = 0 as Weight;
    for (neighbor, edge_weight) in graph.wedges(node) {
        if parts[neighbor] == from_part {
            gain -= edge_weight;
        } else if parts[neighbor] == to_part {
            gain += edge_weight;
        }
    }
    gain
}

/// Refine an existing `num_parts`-way partitioning of `graph` in place.
///
/// Each outer iteration builds a priority queue over every boundary node,
/// then repeatedly pops the highest-priority node and moves it to
/// whichever neighboring part gives the best gain without pushing that
/// part's weight past `average_weight + ceil(average_weight / (100 /
/// max_disbalance_percent))`. Moves are undone back to the point of best
/// cumulative gain at the end of each iteration; iteration stops early
/// once an iteration fails to improve on the best gain seen so far.
pub fn refine_parts_fm(graph: &WeightedGraph, parts: &mut [PartId], num_parts: usize, max_disbalance_percent: Weight, max_iter: usize) {
    assert_eq!(graph.num_nodes(), parts.len());
    assert!(num_parts > 0);
    assert!(max_disbalance_percent > 0);

    let total_weight: Weight = graph.wnodes().map(|(_, w)| w).sum();
    let mut part_weights = vec![0 as Weight; num_parts];
    for (node, weight) in graph.wnodes() {
        part_weights[parts[node]] += weight;
    }

    let average_weight = total_weight / num_parts as Weight;
    let divisor = (100 / max_disbalance_percent).max(1);
    let max_part_weight = average_weight + divide_up(average_weight, divisor);

    let mut moved = vec![false; graph.num_nodes()];
    let mut undo_moves: Vec<(NodeId, PartId, PartId)> = Vec::new();

    for _ in 0..max_iter {
        let mut queue = GainQueue::new(graph.num_nodes());
        for node in graph.nodes() {
            if !is_internal(graph, parts, node) {
                queue.emplace(node, compute_priority(graph, parts, num_parts, node));
            }
        }

        for m in moved.iter_mut() {
            *m = false;
        }
        undo_moves.clear();
        let mut total_gain: Weight = 0;
        let mut best_total_gain: Weight = 0;

        while let Some(node) = queue.pop() {
            let from_part = parts[node];
            let mut neighboring_parts = vec![false; num_parts];
            for neighbor in graph.edges(node) {
                if parts[neighbor] != from_part {
                    neighboring_parts[parts[neighbor]] = true;
                }
            }

            let mut best_move: Option<(Weight, Weight, u64, PartId)> = None;
            for to_part in 0..num_parts {
                if !neighboring_parts[to_part] {
                    continue;
                }
                if part_weights[to_part] + graph.weight(node) > max_part_weight {
                    continue;
                }
                let gain = compute_gain(graph, parts, node, to_part);
                let key = (gain, -part_weights[to_part], randomized_hash(to_part as u64));
                let better = match best_move {
                    None => true,
                    Some((best_gain, best_neg_weight, best_hash, _)) => key > (best_gain, best_neg_weight, best_hash),
                };
                if better {
                    best_move = Some((key.0, key.1, key.2, to_part));
                }
            }
            let Some((gain, _, _, to_part)) = best_move else {
                continue;
            };

            part_weights[from_part] -= graph.weight(node);
            part_weights[to_part] += graph.weight(node);
            parts[node] = to_part;
            moved[node] = true;

            total_gain += gain;
            if total_gain > best_total_gain {
                best_total_gain = total_gain;
                undo_moves.clear();
            } else {
                undo_moves.push((node, from_part, to_part));
            }

            for neighbor in graph.edges(node) {
                if moved[neighbor] {
                    continue;
                }
                queue.erase(neighbor);
                if !is_internal(graph, parts, neighbor) {
                    queue.emplace(neighbor, compute_priority(graph, parts, num_parts, neighbor));
                }
            }
        }

        for &(node, from_part, to_part) in undo_moves.iter().rev() {
            part_weights[to_part] -= graph.weight(node);
            part_weights[from_part] += graph.weight(node);
            parts[node] = from_part;
        }

        if best_total_gain <= 0 {
            break;
        }
    }
}

/// [`refine_parts_fm`] with the default disbalance cap and iteration limit.
pub fn refine_parts_fm_default(graph: &WeightedGraph, parts: &mut [PartId], num_parts: usize) {
    refine_parts_fm(graph, parts, num_parts, DEFAULT_MAX_DISBALANCE_PERCENT, DEFAULT_MAX_ITER);
}

fn divide_up(a: Weight, b: Weight) -> Weight {
    (a + b - 1) / b
}

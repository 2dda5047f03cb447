//! Grid-graph ("pixelated") partitioning: bucket points into a uniform
//! grid, treat non-empty cells as graph nodes with an edge to each
//! axis-adjacent non-empty cell, partition that small topological graph
//! with the graph layer (R3), then propagate each cell's part to every
//! point it contains.
//!
//! The edge weight between two adjacent cells is the product of their
//! point counts: a cheap proxy for the amount of SPH-like all-to-all
//! neighbor coupling that would need to cross a cut drawn between them.

use std::collections::HashMap;

use crate::algebra::{FloatScalar, Vector};
use crate::geometry::bbox::BBox;
use crate::geometry::point_range::{compute_bbox, iota_perm};
use crate::graph::{multilevel_partition, NodeId, Weight, WeightedGraph};

fn cell_index<N: FloatScalar, const D: usize>(
    bbox: &BBox<N, D>,
    cell_extents_recip: &Vector<N, D>,
    num_cells: &[usize; D],
    point: Vector<N, D>,
) -> [usize; D] {
    let origin = bbox.low();
    let mut index = [0usize; D];
    for axis in 0..D {
        let offset = (point[axis] - origin[axis]) * cell_extents_recip[axis];
        let clamped = offset.scalar_max(N::zero());
        let i: usize = num_traits::cast(clamped.floor()).unwrap_or(0);
        index[axis] = i.min(num_cells[axis] - 1);
    }
    index
}

fn flat_cell_index<const D: usize>(num_cells: &[usize; D], index: &[usize; D]) -> usize {
    let mut flat = index[0];
    for axis in 1..D {
        flat = num_cells[axis] * flat + index[axis];
    }
    flat
}

/// Neighbor flat cell indices of `index` that differ by one cell along a
/// single axis and remain within `0..num_cells[axis]` on every axis.
fn axis_neighbors<const D: usize>(num_cells: &[usize; D], index: &[usize; D]) -> Vec<usize> {
    let mut out = Vec::with_capacity(2 * D);
    for axis in 0..D {
        if index[axis] > 0 {
            let mut n = *index;
            n[axis] -= 1;
            out.push(flat_cell_index(num_cells, &n));
        }
        if index[axis] + 1 < num_cells[axis] {
            let mut n = *index;
            n[axis] += 1;
            out.push(flat_cell_index(num_cells, &n));
        }
    }
    out
}

/// Partition `points` by bucketing them into a uniform grid of cells with
/// approximately `size_hint` extent, building a weighted graph over the
/// non-empty cells (nodes weighted by point count, edges between
/// axis-adjacent cells weighted by the product of endpoint weights), and
/// partitioning that cell graph with the multilevel graph partitioner.
/// Every point takes the part label of the cell it falls into.
pub fn grid_graph_partition<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    parts: &mut [usize],
    num_parts: usize,
    init_part: usize,
    size_hint: N,
) {
    assert!(num_parts > 0, "number of parts must be positive");
    assert!(points.len() >= num_parts, "fewer points than parts");
    assert_eq!(points.len(), parts.len());
    assert!(size_hint > N::zero(), "cell size hint must be positive");

    let two = N::one() + N::one();
    let bbox = compute_bbox(points, &iota_perm(points.len())).grow(size_hint / two);
    let extents = bbox.extents();

    let mut num_cells = [1usize; D];
    let mut cell_extents_recip = Vector::zero();
    for axis in 0..D {
        let n_float = (extents[axis] / size_hint).ceil();
        let n = if n_float < N::one() {
            1usize
        } else {
            num_traits::cast(n_float).expect("cell count not representable in usize")
        };
        num_cells[axis] = n;
        let cell_extent = extents[axis] / num_traits::cast(n).unwrap();
        cell_extents_recip[axis] = N::one() / cell_extent;
    }

    let point_cells: Vec<[usize; D]> = points
        .iter()
        .map(|&p| cell_index(&bbox, &cell_extents_recip, &num_cells, p))
        .collect();
    let point_flat_cells: Vec<usize> = point_cells
        .iter()
        .map(|index| flat_cell_index(&num_cells, index))
        .collect();

    // Compact node ids in ascending flat-cell-index order, matching the
    // deterministic ordering the rest of this crate relies on elsewhere.
    let mut cell_counts: HashMap<usize, usize> = HashMap::new();
    for &flat in &point_flat_cells {
        *cell_counts.entry(flat).or_insert(0) += 1;
    }
    let mut occupied: Vec<usize> = cell_counts.keys().copied().collect();
    occupied.sort_unstable();
    let node_of_cell: HashMap<usize, NodeId> = occupied.iter().enumerate().map(|(n, &c)| (c, n)).collect();

    let mut graph = WeightedGraph::new();
    for &flat in &occupied {
        let weight = cell_counts[&flat] as Weight;
        let index = unflatten(&num_cells, flat);
        let neighbors: Vec<(NodeId, Weight)> = axis_neighbors(&num_cells, &index)
            .into_iter()
            .filter_map(|neighbor_flat| {
                let &neighbor_weight = cell_counts.get(&neighbor_flat)?;
                let neighbor_node = node_of_cell[&neighbor_flat];
                Some((neighbor_node, weight * neighbor_weight as Weight))
            })
            .collect();
        graph.append_node(weight, &neighbors);
    }

    let mut cell_parts = vec![0usize; graph.num_nodes()];
    multilevel_partition(&graph, &mut cell_parts, num_parts);

    for (i, &flat) in point_flat_cells.iter().enumerate() {
        let node = node_of_cell[&flat];
        parts[i] = init_part + cell_parts[node];
    }

    tracing::debug!(num_cells = graph.num_nodes(), num_parts, "grid-graph partition complete");
}

fn unflatten<const D: usize>(num_cells: &[usize; D], mut flat: usize) -> [usize; D] {
    let mut index = [0usize; D];
    for axis in (0..D).rev() {
        index[axis] = flat % num_cells[axis];
        flat /= num_cells[axis];
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(nx: i32, ny: i32) -> Vec<Vector<f64, 2>> {
        let mut points = Vec::new();
        for y in 0..ny {
            for x in 0..nx {
                points.push(Vector::from_array([x as f64, y as f64]));
            }
        }
        points
    }

    #[test]
    fn every_point_gets_a_valid_part() {
        let points = lattice(16, 16);
        let mut parts = vec![usize::MAX; points.len()];
        grid_graph_partition(&points, &mut parts, 4, 0, 2.0);
        assert!(parts.iter().all(|&p| p < 4));
    }

    #[test]
    fn neighboring_points_tend_to_share_a_part() {
        // A single dense blob with a wide cell size collapses into one
        // cell, so every point must land in the same part.
        let points = lattice(4, 4);
        let mut parts = vec![usize::MAX; points.len()];
        grid_graph_partition(&points, &mut parts, 1, 0, 100.0);
        let first = parts[0];
        assert!(parts.iter().all(|&p| p == first));
    }
}

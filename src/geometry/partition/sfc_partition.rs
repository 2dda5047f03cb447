//! Partition by sorting along a space-filling curve and cutting the
//! resulting permutation into contiguous, near-equal-size runs.

use crate::algebra::{FloatScalar, Vector};
use crate::geometry::point_range::iota_perm;
use crate::geometry::sort::{hilbert_sort, morton_sort};

fn assign_from_perm(perm: &[usize], parts: &mut [usize], num_parts: usize, init_part: usize) {
    let num_points = perm.len();
    let part_size = num_points / num_parts;
    let remainder = num_points % num_parts;
    for part in 0..num_parts {
        let first = part * part_size + part.min(remainder);
        let last = (part + 1) * part_size + (part + 1).min(remainder);
        for &i in &perm[first..last] {
            parts[i] = init_part + part;
        }
    }
}

/// Partition `points` by sorting them along the Morton curve and cutting
/// the sorted permutation into `num_parts` contiguous, near-equal runs.
pub fn morton_curve_partition<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    parts: &mut [usize],
    num_parts: usize,
    init_part: usize,
) {
    assert!(num_parts > 0, "number of parts must be positive");
    assert!(points.len() >= num_parts, "fewer points than parts");
    assert_eq!(points.len(), parts.len());
    let mut perm = iota_perm(points.len());
    morton_sort(points, &mut perm);
    assign_from_perm(&perm, parts, num_parts, init_part);
}

/// Partition `points` by sorting them along the Hilbert curve and cutting
/// the sorted permutation into `num_parts` contiguous, near-equal runs.
pub fn hilbert_curve_partition<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    parts: &mut [usize],
    num_parts: usize,
    init_part: usize,
) {
    assert!(num_parts > 0, "number of parts must be positive");
    assert!(points.len() >= num_parts, "fewer points than parts");
    assert_eq!(points.len(), parts.len());
    let mut perm = iota_perm(points.len());
    hilbert_sort(points, &mut perm);
    assign_from_perm(&perm, parts, num_parts, init_part);
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
    fn morton_partition_assigns_every_point() {
        let points = lattice(8, 8);
        let mut parts = vec![usize::MAX; points.len()];
        morton_curve_partition(&points, &mut parts, 4, 0);
        assert!(parts.iter().all(|&p| p < 4));
    }

    #[test]
    fn hilbert_partition_produces_balanced_parts() {
        let points = lattice(8, 8);
        let mut parts = vec![usize::MAX; points.len()];
        hilbert_curve_partition(&points, &mut parts, 4, 0);
        let mut counts = [0usize; 4];
        for &p in &parts {
            counts[p] += 1;
        }
        assert_eq!(counts.iter().sum::<usize>(), points.len());
    }
}

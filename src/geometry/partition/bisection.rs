//! Pure splitter operators over an index permutation: partition-by-pivot
//! and median-split, along a coordinate axis, a direction, or the axis of
//! largest inertia.
//!
//! None of these operators reorder `points`; they only permute `perm`.

use crate::algebra::{FloatScalar, Vector};
use crate::error::MatEigError;
use crate::geometry::point_range::{compute_bbox, compute_largest_inertia_axis};

/// Partition `perm` in place so that every index whose coordinate along
/// `axis` is `< pivot` (or `> pivot` when `reverse` is set) comes first.
/// Returns the two resulting sub-slices.
pub fn coord_bisection<'p, N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &'p mut [usize],
    pivot: N,
    axis: usize,
    reverse: bool,
) -> (&'p mut [usize], &'p mut [usize]) {
    let split = itertools::partition(&mut *perm, |&i| {
        if reverse {
            points[i][axis] > pivot
        } else {
            points[i][axis] < pivot
        }
    });
    perm.split_at_mut(split)
}

/// Like [`coord_bisection`], but along an arbitrary direction rather than
/// a canonical axis.
pub fn dir_bisection<'p, N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &'p mut [usize],
    pivot: N,
    dir: Vector<N, D>,
    reverse: bool,
) -> (&'p mut [usize], &'p mut [usize]) {
    let split = itertools::partition(&mut *perm, |&i| {
        let proj = points[i].dot(&dir);
        if reverse {
            proj > pivot
        } else {
            proj < pivot
        }
    });
    perm.split_at_mut(split)
}

/// Reorder `perm` so that the element at `median` is in sorted position
/// with respect to the coordinate along `axis`, every earlier element is
/// `<=` it, and every later element is `>=` it. `axis` defaults to the
/// box's longest extent when `None`.
pub fn coord_median_split<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &mut [usize],
    median: usize,
    axis: Option<usize>,
) -> usize {
    let axis = axis.unwrap_or_else(|| compute_bbox(points, perm).longest_axis());
    perm.select_nth_unstable_by(median, |&a, &b| {
        points[a][axis]
            .partial_cmp(&points[b][axis])
            .expect("non-comparable coordinate (NaN?)")
    });
    axis
}

/// Like [`coord_median_split`], but with respect to the projection onto
/// `dir` rather than a canonical axis.
pub fn dir_median_split<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &mut [usize],
    median: usize,
    dir: Vector<N, D>,
) {
    perm.select_nth_unstable_by(median, |&a, &b| {
        points[a]
            .dot(&dir)
            .partial_cmp(&points[b].dot(&dir))
            .expect("non-comparable projection (NaN?)")
    });
}

/// Median-split along the axis of largest inertia of the points named by
/// `perm`. Falls back to `fallback_dir` if the inertia eigendecomposition
/// does not converge.
pub fn inertial_median_split<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &mut [usize],
    median: usize,
    fallback_dir: Vector<N, D>,
) -> Result<Vector<N, D>, MatEigError> {
    let dir = match compute_largest_inertia_axis(points, perm) {
        Ok(axis) => axis,
        Err(err) => {
            tracing::debug!(?err, "inertia eigendecomposition failed, using fallback direction");
            fallback_dir
        }
    };
    dir_median_split(points, perm, median, dir);
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_range::iota_perm;

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
    fn coord_bisection_splits_by_pivot() {
        let points = lattice(8, 1);
        let mut perm = iota_perm(points.len());
        let (left, right) = coord_bisection(&points, &mut perm, 4.0, 0, false);
        assert!(left.iter().all(|&i| points[i][0] < 4.0));
        assert!(right.iter().all(|&i| points[i][0] >= 4.0));
    }

    #[test]
    fn coord_median_split_orders_around_pivot() {
        let points = lattice(9, 1);
        let mut perm = iota_perm(points.len());
        let median = perm.len() / 2;
        coord_median_split(&points, &mut perm, median, Some(0));
        let pivot = points[perm[median]][0];
        assert!(perm[..median].iter().all(|&i| points[i][0] <= pivot));
        assert!(perm[median..].iter().all(|&i| points[i][0] >= pivot));
    }

    #[test]
    fn inertial_split_preserves_permutation_multiset() {
        let points = lattice(6, 6);
        let mut perm = iota_perm(points.len());
        let mut sorted = perm.clone();
        let _ = inertial_median_split(&points, &mut perm, perm.len() / 2, Vector::from_array([1.0, 0.0]));
        let mut result = perm.clone();
        result.sort_unstable();
        sorted.sort_unstable();
        assert_eq!(result, sorted);
    }
}

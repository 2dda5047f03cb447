//! Morton (Z-order) curve sort: recursively bisect the bounding box by its
//! geometric center, cycling through axes from `D - 1` down to `0`.

use crate::algebra::{FloatScalar, Vector};
use crate::geometry::bbox::BBox;
use crate::geometry::partition::bisection::coord_bisection;
use crate::geometry::point_range::compute_bbox;
use crate::parallel::{RunMode, TaskGroup};

const PARALLEL_THRESHOLD: usize = 50;
const MAX_LEVELS: usize = 192;

fn axis_for_level<const D: usize>(level: usize) -> usize {
    D - 1 - (level % D)
}

fn recurse<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &mut [usize],
    group: &mut TaskGroup<'_, '_>,
    bbox: BBox<N, D>,
    level: usize,
) {
    if perm.len() <= 1 || level >= MAX_LEVELS {
        return;
    }
    let axis = axis_for_level::<D>(level);
    let pivot = bbox.center()[axis];
    let (left, right) = coord_bisection(points, perm, pivot, axis, false);
    let (lo_box, hi_box) = bbox.split(axis, pivot, false);

    let mode = if left.len().max(right.len()) >= PARALLEL_THRESHOLD {
        RunMode::Parallel
    } else {
        RunMode::Sequential
    };

    // SAFETY note for future maintainers: `left` and `right` are disjoint
    // subslices of the same `perm` buffer, so recursing into each from a
    // task-group task is data-race-free even when both run concurrently.
    let left_ptr: *mut [usize] = left;
    let right_ptr: *mut [usize] = right;
    let points_ptr: *const [Vector<N, D>] = points;

    group.run(mode, move || {
        let left = unsafe { &mut *left_ptr };
        let points = unsafe { &*points_ptr };
        TaskGroup::with(|inner| recurse(points, left, inner, lo_box, level + 1));
    });
    group.run(mode, move || {
        let right = unsafe { &mut *right_ptr };
        let points = unsafe { &*points_ptr };
        TaskGroup::with(|inner| recurse(points, right, inner, hi_box, level + 1));
    });
}

/// Reorder `perm` so that it lists point indices along the Morton (Z-order)
/// curve through their bounding box.
pub fn morton_sort<N: FloatScalar, const D: usize>(points: &[Vector<N, D>], perm: &mut [usize]) {
    if perm.len() <= 1 {
        return;
    }
    let bbox = compute_bbox(points, perm);
    TaskGroup::with(|group| recurse(points, perm, group, bbox, 0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_range::iota_perm;

    fn lattice_8x8() -> Vec<Vector<f64, 2>> {
        (0..64)
            .map(|i| Vector::from_array([(i % 8) as f64, (i / 8) as f64]))
            .collect()
    }

    #[test]
    fn morton_sort_matches_reference_permutation() {
        let points = lattice_8x8();
        let mut perm = iota_perm(points.len());
        morton_sort(&points, &mut perm);
        assert_eq!(&perm[..8], &[0, 1, 8, 9, 2, 3, 10, 11]);
    }

    #[test]
    fn morton_sort_is_a_bijection() {
        let points = lattice_8x8();
        let mut perm = iota_perm(points.len());
        morton_sort(&points, &mut perm);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, iota_perm(points.len()));
    }

    proptest::proptest! {
        #[test]
        fn morton_sort_is_always_a_bijection(
            coords in proptest::collection::vec((0.0f64..100.0, 0.0f64..100.0), 1..200)
        ) {
            let points: Vec<Vector<f64, 2>> = coords
                .into_iter()
                .map(|(x, y)| Vector::from_array([x, y]))
                .collect();
            let mut perm = iota_perm(points.len());
            morton_sort(&points, &mut perm);
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            proptest::prop_assert_eq!(sorted, iota_perm(points.len()));
        }
    }
}

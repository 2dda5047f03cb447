//! Hilbert curve sort: like [`super::morton::morton_sort`], but the axis
//! cycled at each level and the sign of the bisection at each level follow
//! a rotation-state machine instead of a fixed round-robin, which is what
//! gives the Hilbert curve its locality advantage over Morton order.

use crate::algebra::{FloatScalar, Vector};
use crate::geometry::bbox::BBox;
use crate::geometry::partition::bisection::coord_bisection;
use crate::geometry::point_range::compute_bbox;
use crate::parallel::{RunMode, TaskGroup};

const PARALLEL_THRESHOLD: usize = 50;

/// A single orientation of the `D`-dimensional Hilbert curve: which axis is
/// split next (`axis`) and which direction each axis currently runs in,
/// packed one bit per axis (`dirs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HilbertRotation<const D: usize> {
    axis: usize,
    dirs: u32,
}

impl<const D: usize> HilbertRotation<D> {
    fn new(axis: usize, dirs: u32) -> Self {
        Self { axis, dirs }
    }

    fn dir(&self) -> bool {
        (self.dirs & (1 << self.axis)) != 0
    }

    /// Rotation table entries below are taken directly from the canonical
    /// 2D and 3D Hilbert curve constructions; higher dimensions are not
    /// supported by this curve (callers needing them should fall back to
    /// [`super::morton::morton_sort`]).
    fn shift_flip_tables() -> (&'static [usize], &'static [u32]) {
        match D {
            2 => (&[1, 0, 0, 1], &[0, 0, 0, 0b11]),
            3 => (
                &[2, 1, 1, 0, 0, 1, 1, 2],
                &[0, 0, 0, 0b110, 0b110, 0b011, 0b011, 0b101],
            ),
            _ => panic!("Hilbert curve sort only supports 2 or 3 dimensions"),
        }
    }

    /// Advance to the next axis in round-robin order, direction bits unchanged.
    fn shift(&self) -> Self {
        Self::new((self.axis + 1) % D, self.dirs)
    }

    /// Flip the direction bit of the current axis.
    fn flip(&self) -> Self {
        Self::new(self.axis, self.dirs ^ (1 << self.axis))
    }

    /// Look up the rotation reached after visiting the `index`-th child
    /// (`index` in `0..2^D`) of a cell whose traversal started at `self`.
    fn next(&self, index: usize) -> Self {
        let (shifts, flips) = Self::shift_flip_tables();
        Self::new((self.axis + shifts[index]) % D, self.dirs ^ flips[index])
    }

    /// Distance between `self` and `init`'s direction bits, used once a
    /// full cycle through every axis has completed. `self.axis` and
    /// `init.axis` must already agree.
    fn index(&self, init: &Self) -> usize {
        let flips = self.dirs ^ init.dirs;
        let mut dist = 0;
        for i in 0..D {
            let axis = (self.axis + i) % D;
            let flipped = (flips >> axis) & 1;
            dist |= (flipped as usize) << (D - i - 1);
        }
        dist
    }
}

#[derive(Clone, Copy, Debug)]
struct HilbertState<const D: usize> {
    init_rot: HilbertRotation<D>,
    curr_rot: HilbertRotation<D>,
}

impl<const D: usize> HilbertState<D> {
    fn initial() -> Self {
        let rot = HilbertRotation::new(0, 0);
        Self {
            init_rot: rot,
            curr_rot: rot,
        }
    }

    fn from_rot(rot: HilbertRotation<D>) -> Self {
        Self {
            init_rot: rot,
            curr_rot: rot,
        }
    }

    fn axis(&self) -> usize {
        self.curr_rot.axis
    }

    fn dir(&self) -> bool {
        self.curr_rot.dir()
    }

    fn next(&self) -> (Self, Self) {
        let next_rot = self.curr_rot.shift();
        if next_rot.axis != self.init_rot.axis {
            (
                Self {
                    init_rot: self.init_rot,
                    curr_rot: next_rot,
                },
                Self {
                    init_rot: self.init_rot,
                    curr_rot: next_rot.flip(),
                },
            )
        } else {
            let index = next_rot.index(&self.init_rot);
            (
                Self::from_rot(self.init_rot.next(2 * index)),
                Self::from_rot(self.init_rot.next(2 * index + 1)),
            )
        }
    }
}

fn recurse<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &mut [usize],
    group: &mut TaskGroup<'_, '_>,
    bbox: BBox<N, D>,
    state: HilbertState<D>,
) {
    if perm.len() <= 1 {
        return;
    }
    let axis = state.axis();
    let reverse = state.dir();
    let pivot = bbox.center()[axis];
    let (left, right) = coord_bisection(points, perm, pivot, axis, reverse);
    let (lo_box, hi_box) = bbox.split(axis, pivot, reverse);
    let (left_state, right_state) = state.next();

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
        TaskGroup::with(|inner| recurse(points, left, inner, lo_box, left_state));
    });
    group.run(mode, move || {
        let right = unsafe { &mut *right_ptr };
        let points = unsafe { &*points_ptr };
        TaskGroup::with(|inner| recurse(points, right, inner, hi_box, right_state));
    });
}

/// Reorder `perm` so that it lists point indices along the Hilbert curve
/// through their bounding box. Supported in 2 and 3 dimensions.
pub fn hilbert_sort<N: FloatScalar, const D: usize>(points: &[Vector<N, D>], perm: &mut [usize]) {
    if perm.len() <= 1 {
        return;
    }
    let bbox = compute_bbox(points, perm);
    let state = HilbertState::<D>::initial();
    TaskGroup::with(|group| recurse(points, perm, group, bbox, state));
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

    fn lattice_4x4x4() -> Vec<Vector<f64, 3>> {
        let mut points = Vec::new();
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    points.push(Vector::from_array([x as f64, y as f64, z as f64]));
                }
            }
        }
        points
    }

    #[test]
    fn hilbert_sort_is_a_bijection_2d() {
        let points = lattice_8x8();
        let mut perm = iota_perm(points.len());
        hilbert_sort(&points, &mut perm);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, iota_perm(points.len()));
    }

    #[test]
    fn hilbert_sort_neighbors_are_spatially_close_2d() {
        let points = lattice_8x8();
        let mut perm = iota_perm(points.len());
        hilbert_sort(&points, &mut perm);
        for w in perm.windows(2) {
            let a = points[w[0]];
            let b = points[w[1]];
            let d = (a - b).norm2();
            assert!(d <= 1.0 + 1e-9, "Hilbert neighbors should be adjacent lattice cells, got distance^2={d}");
        }
    }

    #[test]
    fn hilbert_sort_is_a_bijection_3d() {
        let points = lattice_4x4x4();
        let mut perm = iota_perm(points.len());
        hilbert_sort(&points, &mut perm);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, iota_perm(points.len()));
    }

    #[test]
    fn hilbert_sort_matches_reference_permutation_2d() {
        let points = lattice_8x8();
        let mut perm = iota_perm(points.len());
        hilbert_sort(&points, &mut perm);
        #[rustfmt::skip]
        let expected = [
            0, 8, 9, 1, 2, 3, 11, 10, 18, 19, 27, 26, 25, 17, 16, 24, 32, 33,
            41, 40, 48, 56, 57, 49, 50, 58, 59, 51, 43, 42, 34, 35, 36, 37,
            45, 44, 52, 60, 61, 53, 54, 62, 63, 55, 47, 46, 38, 39, 31, 23,
            22, 30, 29, 28, 20, 21, 13, 12, 4, 5, 6, 14, 15, 7,
        ];
        assert_eq!(perm, expected);
    }

    #[test]
    fn hilbert_sort_matches_reference_permutation_3d() {
        let points = lattice_4x4x4();
        let mut perm = iota_perm(points.len());
        hilbert_sort(&points, &mut perm);
        #[rustfmt::skip]
        let expected = [
            0, 4, 5, 1, 17, 21, 20, 16, 32, 33, 49, 48, 52, 53, 37, 36, 40,
            41, 57, 56, 60, 61, 45, 44, 28, 12, 8, 24, 25, 9, 13, 29, 30, 14,
            10, 26, 27, 11, 15, 31, 47, 46, 62, 63, 59, 58, 42, 43, 39, 38,
            54, 55, 51, 50, 34, 35, 19, 23, 22, 18, 2, 6, 7, 3,
        ];
        assert_eq!(perm, expected);
    }
}

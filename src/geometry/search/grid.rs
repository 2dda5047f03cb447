//! Uniform grid spatial search index: bucket points into axis-aligned
//! cells of roughly `size_hint` extent, then restrict a radius query to
//! the handful of cells overlapping the search box.

use crate::algebra::{FloatScalar, Vector};
use crate::geometry::bbox::BBox;
use crate::geometry::point_range::{compute_bbox, copy_points_near_filtered, iota_perm};
use crate::graph::multivector::Multivector;

/// A uniform grid over a borrowed point set, indexed for radius queries.
///
/// Cell size is chosen from a size hint rather than a fixed cell count, so
/// the index degrades gracefully to a single cell for tiny point sets and
/// to a fine grid for dense ones.
pub struct GridIndex<'p, N, const D: usize> {
    points: &'p [Vector<N, D>],
    bbox: BBox<N, D>,
    num_cells: [usize; D],
    cell_extents: Vector<N, D>,
    cell_extents_recip: Vector<N, D>,
    cell_points: Multivector<usize>,
}

impl<'p, N: FloatScalar, const D: usize> GridIndex<'p, N, D> {
    /// Index `points` for search using a grid with cells of approximately
    /// `size_hint` extent, typically twice the particle spacing.
    pub fn new(points: &'p [Vector<N, D>], size_hint: N) -> Self {
        assert!(size_hint > N::zero(), "cell size hint must be positive");
        assert!(!points.is_empty(), "cannot index zero points");

        let two = N::one() + N::one();
        let bbox = compute_bbox(points, &iota_perm(points.len())).grow(size_hint / two);
        let extents = bbox.extents();

        let mut num_cells = [1usize; D];
        let mut cell_extents = Vector::zero();
        for axis in 0..D {
            let n_float = (extents[axis] / size_hint).ceil();
            let n = if n_float < N::one() {
                1usize
            } else {
                num_traits::cast(n_float).expect("cell count not representable in usize")
            };
            num_cells[axis] = n;
            cell_extents[axis] = extents[axis] / num_traits::cast(n).unwrap();
        }
        let mut cell_extents_recip = Vector::zero();
        for axis in 0..D {
            cell_extents_recip[axis] = N::one() / cell_extents[axis];
        }

        let num_rows: usize = num_cells.iter().product();
        let pairs = points.iter().enumerate().map(|(i, &p)| {
            let cell = cell_index(&bbox, &cell_extents_recip, &num_cells, p);
            (flat_cell_index(&num_cells, &cell), i)
        });
        let cell_points = Multivector::assign_pairs_tall(num_rows, pairs);

        Self {
            points,
            bbox,
            num_cells,
            cell_extents,
            cell_extents_recip,
            cell_points,
        }
    }

    /// Indices of every point within `search_radius` of `search_point`.
    pub fn search(&self, search_point: Vector<N, D>, search_radius: N) -> Vec<usize> {
        self.search_filtered(search_point, search_radius, |_| true)
    }

    /// Like [`Self::search`], additionally requiring `pred(i)` to hold for
    /// every emitted index `i`.
    pub fn search_filtered(
        &self,
        search_point: Vector<N, D>,
        search_radius: N,
        pred: impl Fn(usize) -> bool + Copy,
    ) -> Vec<usize> {
        assert!(search_radius > N::zero(), "search radius must be positive");

        let two = N::one() + N::one();
        let half_cell = self.cell_extents / two;
        let search_box = BBox::from_point(search_point)
            .grow(search_radius)
            .grow(half_cell.max_value())
            .intersect(&self.bbox)
            .shrink(half_cell.max_value());
        let low = cell_index(&self.bbox, &self.cell_extents_recip, &self.num_cells, search_box.low());
        let high = cell_index(&self.bbox, &self.cell_extents_recip, &self.num_cells, search_box.high());

        let mut out = Vec::new();
        self.visit_cells(&low, &high, |cell| {
            let flat = flat_cell_index(&self.num_cells, cell);
            let bucket = self.cell_points.row(flat);
            out.extend(copy_points_near_filtered(
                self.points,
                bucket,
                search_point,
                search_radius,
                pred,
            ));
        });
        out
    }

    fn visit_cells(&self, low: &[usize; D], high: &[usize; D], mut f: impl FnMut(&[usize; D])) {
        let mut cursor = *low;
        loop {
            f(&cursor);
            let mut axis = 0;
            loop {
                if axis == D {
                    return;
                }
                if cursor[axis] < high[axis] {
                    cursor[axis] += 1;
                    break;
                }
                cursor[axis] = low[axis];
                axis += 1;
            }
        }
    }
}

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
    fn search_finds_nearby_points_only() {
        let points = lattice(8, 8);
        let index = GridIndex::new(&points, 2.0);
        let found = index.search(Vector::from_array([3.0, 3.0]), 1.1);
        let mut found = found
            .into_iter()
            .map(|i| points[i])
            .collect::<Vec<_>>();
        found.sort_by(|a, b| a.as_slice().partial_cmp(b.as_slice()).unwrap());
        let mut expected = vec![
            Vector::from_array([2.0, 3.0]),
            Vector::from_array([3.0, 2.0]),
            Vector::from_array([3.0, 3.0]),
            Vector::from_array([3.0, 4.0]),
            Vector::from_array([4.0, 3.0]),
        ];
        expected.sort_by(|a, b| a.as_slice().partial_cmp(b.as_slice()).unwrap());
        assert_eq!(found, expected);
    }

    #[test]
    fn search_misses_far_points() {
        let points = lattice(8, 8);
        let index = GridIndex::new(&points, 2.0);
        let found = index.search(Vector::from_array([0.0, 0.0]), 0.5);
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn search_filtered_honors_predicate() {
        let points = lattice(8, 8);
        let index = GridIndex::new(&points, 2.0);
        let found = index.search_filtered(Vector::from_array([3.0, 3.0]), 1.1, |i| i % 2 == 0);
        assert!(found.iter().all(|&i| i % 2 == 0));
        assert!(!found.is_empty());
    }
}

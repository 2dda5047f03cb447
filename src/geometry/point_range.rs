//! Aggregate statistics over a point cloud addressed through an index
//! permutation: centroid, bounding box, inertia tensor, and the axis of
//! largest inertia.

use crate::algebra::{FloatScalar, Matrix};
use crate::error::MatEigError;
use crate::algebra::Vector;

use super::bbox::BBox;

/// The identity permutation `[0, 1, ..., points.len() - 1]`.
pub fn iota_perm(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// Arithmetic mean of `points[perm[i]]` over `perm`. Panics if `perm` is
/// empty.
pub fn compute_center<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
) -> Vector<N, D> {
    assert!(!perm.is_empty(), "cannot compute the center of zero points");
    let mut sum = Vector::zero();
    for &i in perm {
        sum += points[i];
    }
    let count = num_traits::cast(perm.len()).expect("point count not representable in scalar type");
    sum / count
}

/// The smallest axis-aligned box containing `points[perm[i]]` for every
/// `i`. Panics if `perm` is empty.
pub fn compute_bbox<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
) -> BBox<N, D> {
    assert!(!perm.is_empty(), "cannot compute the bounding box of zero points");
    let mut bbox = BBox::from_point(points[perm[0]]);
    for &i in &perm[1..] {
        bbox = bbox.expand(points[i]);
    }
    bbox
}

/// The inertia tensor of `points[perm[i]]` about their centroid:
/// `Σ r_i ⊗ r_i − center ⊗ Σ r_i`, where `r_i = points[perm[i]]`.
pub fn compute_inertia_tensor<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
) -> Matrix<N, D> {
    let mut sum = Vector::zero();
    let mut outer_sum = Matrix::zero();
    for &i in perm {
        let r = points[i];
        sum += r;
        outer_sum = outer_sum.add(&Matrix::outer_sqr(&r));
    }
    let center = sum
        / num_traits::cast(perm.len()).expect("point count not representable in scalar type");
    outer_sum.sub(&Matrix::outer(&center, &sum))
}

/// The eigenvector of the largest eigenvalue of the inertia tensor of
/// `points[perm[i]]`. Fails with [`MatEigError::NotConverged`] if the
/// underlying Jacobi sweep does not converge; callers (notably
/// [`crate::geometry::partition::inertial_median_split`]) fall back to a
/// caller-supplied direction in that case.
pub fn compute_largest_inertia_axis<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
) -> Result<Vector<N, D>, MatEigError> {
    let tensor = compute_inertia_tensor(points, perm);
    let (eigvecs, eigvals) = tensor.eig_symmetric()?;
    let axis = eigvals.max_value_index();
    Ok(eigvecs.col(axis))
}

/// Indices `i` in `perm` for which `points[i]` lies within `radius` of
/// `center`, by Euclidean distance.
pub fn copy_points_near<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
    center: Vector<N, D>,
    radius: N,
) -> Vec<usize> {
    copy_points_near_filtered(points, perm, center, radius, |_| true)
}

/// Like [`copy_points_near`], additionally requiring `pred(i)` to hold.
pub fn copy_points_near_filtered<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    perm: &[usize],
    center: Vector<N, D>,
    radius: N,
    pred: impl Fn(usize) -> bool,
) -> Vec<usize> {
    let radius2 = radius * radius;
    perm.iter()
        .copied()
        .filter(|&i| (points[i] - center).norm2() < radius2 && pred(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_symmetric_points_is_origin() {
        let points = vec![
            Vector::from_array([1.0, 0.0]),
            Vector::from_array([-1.0, 0.0]),
            Vector::from_array([0.0, 1.0]),
            Vector::from_array([0.0, -1.0]),
        ];
        let perm = iota_perm(points.len());
        let center = compute_center(&points, &perm);
        assert!(center.norm() < 1e-12);
    }

    #[test]
    fn largest_inertia_axis_of_a_line_is_the_line_direction() {
        let points = vec![
            Vector::from_array([-2.0, 0.0]),
            Vector::from_array([-1.0, 0.0]),
            Vector::from_array([0.0, 0.0]),
            Vector::from_array([1.0, 0.0]),
            Vector::from_array([2.0, 0.0]),
        ];
        let perm = iota_perm(points.len());
        let axis = compute_largest_inertia_axis(&points, &perm).unwrap();
        assert!(axis[0].abs() > axis[1].abs());
    }

    #[test]
    fn copy_points_near_filters_by_radius() {
        let points = vec![
            Vector::from_array([0.0, 0.0]),
            Vector::from_array([0.5, 0.0]),
            Vector::from_array([5.0, 0.0]),
        ];
        let perm = iota_perm(points.len());
        let near = copy_points_near(&points, &perm, Vector::zero(), 1.0);
        assert_eq!(near, vec![0, 1]);
    }
}

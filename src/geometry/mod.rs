//! Geometric layer: axis-aligned boxes, point-range statistics, bisection
//! and median-split operators, space-filling curve sorts, spatial search
//! indices, and geometric partitioners.

pub mod bbox;
pub mod partition;
pub mod point_range;
pub mod search;
pub mod sort;

pub use bbox::BBox;
pub use point_range::{
    compute_bbox, compute_center, compute_inertia_tensor, compute_largest_inertia_axis,
    copy_points_near, copy_points_near_filtered, iota_perm,
};

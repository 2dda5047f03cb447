//! Geometric partitioning: split a point cloud into balanced parts using
//! only coordinates (and, for the grid-graph partitioner, a topological
//! partition of the induced cell graph).

pub mod bisection;
pub mod grid_graph;
pub mod kmeans;
pub mod rcb;
pub mod sfc_partition;

pub use bisection::{coord_bisection, coord_median_split, dir_bisection, dir_median_split, inertial_median_split};
pub use grid_graph::grid_graph_partition;
pub use kmeans::kmeans_partition;
pub use rcb::{recursive_coord_bisection, recursive_inertial_bisection};
pub use sfc_partition::{hilbert_curve_partition, morton_curve_partition};

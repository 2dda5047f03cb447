//! Space-filling curve sorts: reorder a point cloud's index permutation so
//! that spatially nearby points end up nearby in the permutation too.

pub mod hilbert;
pub mod morton;

pub use hilbert::hilbert_sort;
pub use morton::morton_sort;

//! Spatial search indices: build once over a point set, then answer
//! repeated radius queries without rescanning every point.

mod grid;
mod kdtree;

pub use grid::GridIndex;
pub use kdtree::KdTreeIndex;

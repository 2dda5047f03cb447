//! Weighted graphs and the coarsening, partitioning, and refinement
//! operators built on top of them.

pub mod coarsen;
pub mod multivector;
pub mod partition;
pub mod refine;
pub mod utils;
pub mod weighted;

pub use coarsen::{coarsen_gem, coarsen_hem};
pub use partition::{greedy_partition, multilevel_partition};
pub use refine::refine_parts_fm;
pub use utils::{connected_components, edge_cut};
pub use weighted::{NodeId, PartId, Weight, WeightedGraph, NPOS};

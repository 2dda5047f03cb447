//! A shared-memory spatial and graph partitioning engine for particle and
//! mesh-free codes.
//!
//! # Crate layout
//!
//! - [`algebra`] — fixed-dimension vectors, matrices, and masks (1 to 4
//!   components) with the numeric primitives the rest of the crate is
//!   built on.
//! - [`parallel`] — the shared-memory task-parallel substrate: thread-count
//!   control, a scoped task group, blocked-range algorithms, and a
//!   per-task bump allocator.
//! - [`geometry`] — axis-aligned boxes, point-range statistics, bisection
//!   and median-split operators, space-filling curve sorts, spatial search
//!   indices ([`geometry::search`]), and geometric partitioners
//!   ([`geometry::partition`]).
//! - [`graph`] — the weighted adjacency graph, its coarsening strategies,
//!   the multilevel partitioner, and Fiduccia-Mattheyses refinement.
//! - [`rand`] — deterministic tie-breaking via a SplitMix64-based hash,
//!   used everywhere this crate needs a reproducible stochastic choice.
//! - [`error`] — the one typed, recoverable failure mode in the crate
//!   (symmetric eigendecomposition non-convergence).
//!
//! Everything here is a library: there is no CLI, no wire format, and no
//! persisted state. Given a fixed thread count, a fixed RNG seed (derived
//! deterministically from input size), and identical inputs, every
//! algorithm in this crate produces bit-identical output across runs.

pub mod algebra;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod parallel;
pub mod rand;

pub use algebra::{FloatScalar, Mask, Matrix, Scalar, Vector};
pub use error::MatEigError;

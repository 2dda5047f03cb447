//! Shared-memory parallel substrate shared by the geometric and graph
//! layers: thread-count control, a scoped task group, blocked-range
//! algorithms, and a per-task bump allocator.
//!
//! Everything here is a thin layer over [`rayon`], the same parallelism
//! crate the upstream mesh-partitioning project this code grew out of
//! already depended on.

mod algorithms;
mod arena;
mod control;
mod task_group;

pub use algorithms::{block_for_each, fold, for_each, for_each_range, sort, transform, unstable_copy_if};
pub use arena::MemoryArena;
pub use control::{global_lock, num_threads, set_num_threads, GlobalLock};
pub use task_group::{RunMode, TaskGroup};

//! Global thread-count control and a cooperative global lock.
//!
//! The core algorithms never need mutual exclusion among themselves; the
//! lock exists only as a convenience for callers that want to serialize
//! their own access to this crate's data structures across threads they
//! manage themselves.

use std::sync::{Mutex, OnceLock, RwLock};

static THREAD_POOL: OnceLock<RwLock<rayon::ThreadPool>> = OnceLock::new();
static GLOBAL_MUTEX: Mutex<()> = Mutex::new(());

fn pool() -> &'static RwLock<rayon::ThreadPool> {
    THREAD_POOL.get_or_init(|| {
        RwLock::new(
            rayon::ThreadPoolBuilder::new()
                .build()
                .expect("failed to build default thread pool"),
        )
    })
}

/// Number of worker threads the shared pool currently runs with.
pub fn num_threads() -> usize {
    pool().read().expect("thread pool lock poisoned").current_num_threads()
}

/// Rebuild the shared worker pool with exactly `count` threads.
///
/// This is a global, process-wide setting: every subsequent call into this
/// crate's parallel algorithms runs on the new pool. `count` must be at
/// least 1.
pub fn set_num_threads(count: usize) {
    assert!(count >= 1, "thread count must be at least 1");
    let new_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(count)
        .build()
        .expect("failed to build thread pool with requested thread count");
    *pool().write().expect("thread pool lock poisoned") = new_pool;
}

/// Run `f` on the crate's shared worker pool.
pub(crate) fn install<R: Send>(f: impl FnOnce() -> R + Send) -> R {
    pool().read().expect("thread pool lock poisoned").install(f)
}

/// RAII guard for [`global_lock`]; releases the lock on drop.
#[must_use]
pub struct GlobalLock<'a> {
    _guard: std::sync::MutexGuard<'a, ()>,
}

/// Acquire a process-wide lock shared by every caller of this function.
///
/// Not used by any algorithm in this crate internally; provided so that
/// application code coordinating several threads around shared geometric
/// or graph state has a ready-made mutex to reach for instead of rolling
/// its own.
pub fn global_lock() -> GlobalLock<'static> {
    let guard = GLOBAL_MUTEX.lock().unwrap_or_else(|poison| poison.into_inner());
    GlobalLock { _guard: guard }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_has_at_least_one_thread() {
        assert!(num_threads() >= 1);
    }

    #[test]
    fn global_lock_is_reentrant_safe_across_calls() {
        let _a = global_lock();
        drop(_a);
        let _b = global_lock();
    }
}

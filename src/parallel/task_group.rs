//! A scoped group of work items that may be submitted either for parallel
//! execution or run inline, then joined with a single `wait`.

use rayon::Scope;

/// Whether a task submitted to a [`TaskGroup`] may run on any worker, or
/// must run synchronously on the submitting thread.
///
/// `Sequential` is a policy knob: callers use it to avoid the overhead of
/// spawning a task for small subproblems (e.g. SFC recursion below ~50
/// elements), not a correctness requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Parallel,
    Sequential,
}

/// A scope that work items can be submitted into, joined by [`TaskGroup::wait`].
pub struct TaskGroup<'scope, 'env: 'scope> {
    scope: &'scope Scope<'env>,
}

impl<'scope, 'env> TaskGroup<'scope, 'env> {
    /// Run `body` with a fresh task group, blocking until every task
    /// submitted into it (directly or transitively) has completed.
    pub fn with<R: Send>(body: impl FnOnce(&mut TaskGroup<'_, '_>) -> R + Send) -> R
    where
        R: 'env,
    {
        rayon::in_place_scope(|scope| {
            let mut group = TaskGroup { scope };
            body(&mut group)
        })
    }

    /// Submit `task` according to `mode`. Under `RunMode::Sequential` the
    /// task runs immediately, inline, before this call returns. Under
    /// `RunMode::Parallel` it may run concurrently with other submitted
    /// tasks and with the calling thread.
    pub fn run(&mut self, mode: RunMode, task: impl FnOnce() + Send + 'scope) {
        match mode {
            RunMode::Sequential => task(),
            RunMode::Parallel => self.scope.spawn(move |_| task()),
        }
    }

    /// Explicit join point. In practice every task is already joined when
    /// [`TaskGroup::with`] returns; this is provided for call sites that
    /// want to wait partway through a larger scope.
    pub fn wait(&mut self) {
        // `rayon::Scope` has no standalone wait primitive short of letting
        // the scope end; nested scopes give us an explicit join point.
        rayon::in_place_scope(|_| {});
    }
}

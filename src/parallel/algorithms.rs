//! Parallel range algorithms built on `rayon`'s work-stealing iterators.

use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::control::install;

/// Split `0..len` into worker-sized chunks and call `f(start..end)` on
/// each chunk from some worker thread. Chunk boundaries are an
/// implementation detail; `f` must not assume anything about chunk size.
pub fn for_each_range(len: usize, f: impl Fn(std::ops::Range<usize>) + Sync) {
    if len == 0 {
        return;
    }
    install(|| {
        let threads = super::control::num_threads().max(1);
        let chunk = len.div_ceil(threads).max(1);
        (0..len)
            .step_by(chunk)
            .collect::<Vec<_>>()
            .into_par_iter()
            .for_each(|start| {
                let end = (start + chunk).min(len);
                f(start..end);
            });
    });
}

/// Call `f(i)` for every `i` in `0..len`, in parallel.
pub fn for_each(len: usize, f: impl Fn(usize) + Sync) {
    install(|| (0..len).into_par_iter().for_each(|i| f(i)));
}

/// Iterate `items` (a range of ranges) in chunks of `num_threads()` outer
/// elements; within each chunk, the inner ranges run in parallel.
pub fn block_for_each<T: Sync>(items: &[T], f: impl Fn(&T) + Sync) {
    let block = super::control::num_threads().max(1);
    for chunk in items.chunks(block) {
        install(|| chunk.par_iter().for_each(|item| f(item)));
    }
}

/// Parallel reduction: fold every element of `0..len` into a per-worker
/// accumulator with `combine`, then merge worker accumulators with
/// `reduce_pairs`.
pub fn fold<A: Send>(
    len: usize,
    init: impl Fn() -> A + Sync + Send,
    combine: impl Fn(A, usize) -> A + Sync + Send,
    reduce_pairs: impl Fn(A, A) -> A + Sync + Send,
) -> A {
    install(|| {
        (0..len)
            .into_par_iter()
            .fold(&init, |acc, i| combine(acc, i))
            .reduce(&init, |a, b| reduce_pairs(a, b))
    })
}

/// Apply `f` to every element of `input`, writing results into `output`.
pub fn transform<T: Sync, U: Send>(input: &[T], output: &mut [U], f: impl Fn(&T) -> U + Sync) {
    assert_eq!(input.len(), output.len(), "transform length mismatch");
    install(|| {
        input
            .par_iter()
            .zip(output.par_iter_mut())
            .for_each(|(x, y)| *y = f(x));
    });
}

/// Parallel sort of `items` by `cmp`.
pub fn sort<T: Send>(items: &mut [T], cmp: impl Fn(&T, &T) -> std::cmp::Ordering + Sync) {
    install(|| items.par_sort_unstable_by(cmp));
}

/// Copy every index `i` in `0..len` for which `pred(i)` holds into `out`,
/// in unspecified order. Uses a bounded per-thread staging buffer plus a
/// shared atomic write cursor to limit contention on `out`.
pub fn unstable_copy_if(len: usize, out: &mut Vec<usize>, pred: impl Fn(usize) -> bool + Sync) {
    const STAGE_SIZE: usize = 64;

    let cursor = AtomicUsize::new(out.len());
    let base = out.len();
    out.resize(base + len, 0);
    install(|| {
        (0..len)
            .into_par_iter()
            .chunks(STAGE_SIZE)
            .for_each(|chunk| {
                let staged: Vec<usize> = chunk.into_iter().filter(|&i| pred(i)).collect();
                if staged.is_empty() {
                    return;
                }
                let start = cursor.fetch_add(staged.len(), Ordering::SeqCst);
                // Safety-free: indices below `cursor`'s final value are all
                // within the buffer we resized to `base + len` above, since
                // at most `len` matches can ever be staged.
                let out_ptr = out.as_ptr() as *mut usize;
                unsafe {
                    std::ptr::copy_nonoverlapping(staged.as_ptr(), out_ptr.add(start), staged.len());
                }
            });
    });
    let final_len = cursor.load(Ordering::SeqCst);
    out.truncate(final_len);
}

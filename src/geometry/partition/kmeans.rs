//! K-means++ clustering: seed centroids with squared-distance-weighted
//! sampling, then alternate nearest-centroid assignment and centroid
//! recomputation (Lloyd's algorithm) until the centroid shift drops below
//! a tolerance or the iteration cap is reached.
//!
//! Unlike the other partitioners in this module, cluster sizes are not
//! balanced by construction; they fall out of nearest-centroid assignment
//! alone. That is why the upstream project calls this "clustering" rather
//! than "partitioning".

use crate::algebra::{FloatScalar, Vector};
use crate::rand::SplitMix64;

const DEFAULT_EPS: f64 = 1.0e-4;
const DEFAULT_MAX_ITERS: usize = 10;

/// Draw a uniform `f64` in `[0, 1)` from 53 bits of `rng`'s output.
fn uniform_fraction(rng: &mut SplitMix64) -> f64 {
    (rng.next() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Partition `points` into `num_clusters` clusters using K-means++
/// seeding followed by Lloyd iterations. `parts` is filled with cluster
/// indices in `init_cluster..init_cluster + num_clusters`.
pub fn kmeans_partition<N: FloatScalar, const D: usize>(
    points: &[Vector<N, D>],
    parts: &mut [usize],
    num_clusters: usize,
    init_cluster: usize,
) {
    assert!(num_clusters > 0, "number of clusters must be positive");
    assert!(points.len() >= num_clusters, "fewer points than clusters");
    assert_eq!(points.len(), parts.len());

    let num_points = points.len();
    let mut rng = SplitMix64::new(num_points as u64);

    // K-means++ seeding: the first centroid is drawn uniformly, every
    // later one with probability proportional to its squared distance to
    // the nearest centroid chosen so far.
    let mut centroids = vec![Vector::<N, D>::zero(); num_clusters];
    let mut min_sq_dists = vec![N::max_value(); num_points];
    centroids[0] = points[(rng.next() % num_points as u64) as usize];
    for k in 1..num_clusters {
        let mut total_weight = N::zero();
        for i in 0..num_points {
            let d2 = (points[i] - centroids[k - 1]).norm2();
            if d2 < min_sq_dists[i] {
                min_sq_dists[i] = d2;
            }
            total_weight += min_sq_dists[i];
        }

        let total_weight_f64: f64 = num_traits::cast(total_weight).unwrap_or(0.0);
        let mut remaining = total_weight_f64 * uniform_fraction(&mut rng);
        let mut chosen = num_points - 1;
        for i in 0..num_points {
            let d2_f64: f64 = num_traits::cast(min_sq_dists[i]).unwrap_or(0.0);
            remaining -= d2_f64;
            if remaining <= 0.0 {
                chosen = i;
                break;
            }
        }
        centroids[k] = points[chosen];
    }

    // Sort the seeds lexicographically so that re-running with the same
    // points always assigns the same cluster index to the same region,
    // independent of seeding order.
    centroids.sort_by(|a, b| a.as_slice().partial_cmp(b.as_slice()).unwrap());

    // Lloyd iterations.
    let mut prev_centroids = vec![Vector::<N, D>::zero(); num_clusters];
    let mut counts = vec![0usize; num_clusters];
    for _ in 0..DEFAULT_MAX_ITERS {
        for c in counts.iter_mut() {
            *c = 0;
        }
        for (i, &point) in points.iter().enumerate() {
            let mut best = 0;
            let mut best_dist = (point - centroids[0]).norm2();
            for (c, &centroid) in centroids.iter().enumerate().skip(1) {
                let dist = (point - centroid).norm2();
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            parts[i] = best;
            counts[best] += 1;
        }

        std::mem::swap(&mut centroids, &mut prev_centroids);
        for c in centroids.iter_mut() {
            *c = Vector::zero();
        }
        for (i, &point) in points.iter().enumerate() {
            centroids[parts[i]] += point;
        }
        let mut delta = N::zero();
        for c in 0..num_clusters {
            if counts[c] == 0 {
                centroids[c] = prev_centroids[c];
            } else {
                centroids[c] = centroids[c] / num_traits::cast(counts[c]).unwrap();
                delta += (centroids[c] - prev_centroids[c]).norm2();
            }
        }
        let delta_f64: f64 = num_traits::cast(delta).unwrap_or(0.0);
        if delta_f64 < DEFAULT_EPS * DEFAULT_EPS {
            break;
        }
    }

    for p in parts.iter_mut() {
        *p += init_cluster;
    }
}

//! Label-shuffling surrogates and the null distribution of maximum
//! cluster mass.
//!
//! Each surrogate repartitions the pooled trials of both conditions into
//! two pseudo-groups of the original sizes, recomputes the statistic and
//! keeps the largest absolute cluster mass across all channels and both
//! signs. One sub-seed per surrogate is derived from the master seed up
//! front, so the loop runs on the rayon pool with per-task generators,
//! shares no mutable state, and yields the same null distribution
//! regardless of thread scheduling.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::{Array3, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::cluster::{find_clusters, max_cluster_mass};
use crate::stat::t_statistic;

/// Cooperative cancellation flag for a long surrogate loop.
///
/// Cancelling keeps the surrogates already completed; the truncated
/// count is visible as
/// [`ClusterSearchResult::surrogates_run`](crate::ClusterSearchResult::surrogates_run).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask a running search to stop scheduling further surrogates.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Maximum absolute cluster mass of one relabeling of `pooled`.
///
/// `pooled` is (samples, channels, trials); the first `n_a` indices of a
/// shuffled trial permutation become pseudo-condition A, the rest
/// pseudo-condition B.
fn surrogate_max_mass(pooled: &Array3<f64>, n_a: usize, threshold: f64, seed: u64) -> f64 {
    let n_total = pooled.len_of(Axis(2));
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut idx: Vec<usize> = (0..n_total).collect();
    idx.shuffle(&mut rng);

    let group_a = pooled.select(Axis(2), &idx[..n_a]);
    let group_b = pooled.select(Axis(2), &idx[n_a..]);
    let stat = t_statistic(group_a.view(), group_b.view(), Axis(2));

    let mut max_mass = 0.0_f64;
    for (ch, trace) in stat.axis_iter(Axis(1)).enumerate() {
        let clusters = find_clusters(trace, threshold, ch);
        max_mass = max_mass.max(max_cluster_mass(&clusters));
    }
    max_mass
}

/// Build the null distribution of maximum cluster mass.
///
/// Returns one max-mass value per completed surrogate; fewer than
/// `num_surrogates` values only when `cancel` fired mid-run.
pub(crate) fn null_distribution(
    pooled: &Array3<f64>,
    n_a: usize,
    threshold: f64,
    num_surrogates: usize,
    seed: u64,
    cancel: &CancelToken,
) -> Vec<f64> {
    // One independent sub-seed per surrogate, drawn sequentially from the
    // master generator so the parallel loop stays deterministic.
    let mut master = Xoshiro256PlusPlus::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..num_surrogates).map(|_| master.random()).collect();

    seeds
        .into_par_iter()
        .filter_map(|s| {
            (!cancel.is_cancelled()).then(|| surrogate_max_mass(pooled, n_a, threshold, s))
        })
        .collect()
}

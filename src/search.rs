//! The cluster search itself.
//!
//! One stateless pass per [`ClusterSearch::search`] call:
//!
//! ```text
//! validate (at construction)
//!   → pointwise t statistic of the observed grouping
//!   → suprathreshold clusters per channel
//!   → null distribution of max cluster mass (label-shuffling surrogates)
//!   → corrected p-value and significance flag per cluster
//! ```
//!
//! Inputs are owned by the engine after construction, so the caller's
//! arrays are never mutated and every call sees identical data.
use ndarray::{concatenate, Array3, ArrayD, Axis, IxDyn};
use rand::Rng;

use crate::cluster::{find_clusters, Cluster};
use crate::config::SearchConfig;
use crate::error::InputError;
use crate::source::ConditionSource;
use crate::stat::t_statistic;
use crate::surrogate::{null_distribution, CancelToken};

/// Cluster-based permutation comparison of two conditions.
///
/// Built from exactly two condition arrays shaped (samples, trials) or
/// (samples, channels, trials); trial counts may differ between the
/// conditions, everything else must agree. Construction validates the
/// contract and resolves the permutation seed; [`search`] runs the full
/// procedure.
///
/// [`search`]: ClusterSearch::search
#[derive(Debug, Clone)]
pub struct ClusterSearch {
    /// Condition A, canonicalized to (samples, channels, trials).
    cond_a: Array3<f64>,
    /// Condition B, same canonical layout.
    cond_b: Array3<f64>,
    /// Shape of the statistic array as the caller expects it: the input
    /// shape without its trial axis.
    stat_shape: Vec<usize>,
    cfg: SearchConfig,
    /// Concrete seed, resolved once so repeated searches agree even when
    /// the config left it to entropy.
    seed: u64,
}

impl ClusterSearch {
    /// Validate the two condition arrays and set up the engine.
    ///
    /// # Errors
    ///
    /// [`InputError`] when `data` is not a 2-element sequence, an array
    /// has fewer than 2 dimensions or an empty trial axis, the shapes
    /// disagree outside the trial axis, or `cfg.num_surrogates` is 0.
    pub fn new(data: Vec<ArrayD<f64>>, cfg: SearchConfig) -> Result<Self, InputError> {
        if data.len() != 2 {
            return Err(InputError::ConditionCount(data.len()));
        }
        if cfg.num_surrogates == 0 {
            return Err(InputError::NoSurrogates);
        }
        for (i, arr) in data.iter().enumerate() {
            if arr.ndim() < 2 {
                return Err(InputError::MissingTrialAxis(arr.ndim()));
            }
            if arr.len_of(Axis(arr.ndim() - 1)) == 0 {
                return Err(InputError::NoTrials(i));
            }
        }
        let lanes_a = &data[0].shape()[..data[0].ndim() - 1];
        let lanes_b = &data[1].shape()[..data[1].ndim() - 1];
        if lanes_a != lanes_b {
            return Err(InputError::ShapeMismatch {
                a: data[0].shape().to_vec(),
                b: data[1].shape().to_vec(),
            });
        }
        let stat_shape = lanes_a.to_vec();

        let mut it = data.into_iter();
        let cond_a = canonical(it.next().unwrap());
        let cond_b = canonical(it.next().unwrap());

        let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            cond_a,
            cond_b,
            stat_shape,
            cfg,
            seed,
        })
    }

    /// Build the engine from any [`ConditionSource`].
    pub fn from_source(source: &impl ConditionSource, cfg: SearchConfig) -> anyhow::Result<Self> {
        let data = source.conditions()?;
        Ok(Self::new(data, cfg)?)
    }

    /// The resolved permutation seed (useful for logging a run that used
    /// an entropy seed).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the full search at significance level `alpha`.
    ///
    /// Idempotent: repeated calls return identical results, and two
    /// engines built with the same data and seed agree bitwise.
    pub fn search(&self, alpha: f64) -> ClusterSearchResult {
        self.search_with_cancel(alpha, &CancelToken::new())
    }

    /// [`search`](ClusterSearch::search), checking `cancel` between
    /// surrogates.
    ///
    /// Cancellation truncates the null distribution; everything else
    /// (observed statistic, clusters) is still computed, and
    /// [`ClusterSearchResult::surrogates_run`] reports how many
    /// surrogates actually contributed.
    pub fn search_with_cancel(&self, alpha: f64, cancel: &CancelToken) -> ClusterSearchResult {
        // Observed pass.
        let stat = t_statistic(self.cond_a.view(), self.cond_b.view(), Axis(2));
        let mut clusters = Vec::new();
        for (ch, trace) in stat.axis_iter(Axis(1)).enumerate() {
            clusters.extend(find_clusters(trace, self.cfg.threshold, ch));
        }

        // Null distribution from label-shuffled surrogates.
        let pooled = concatenate(Axis(2), &[self.cond_a.view(), self.cond_b.view()]).unwrap();
        let null = null_distribution(
            &pooled,
            self.cond_a.len_of(Axis(2)),
            self.cfg.threshold,
            self.cfg.num_surrogates,
            self.seed,
            cancel,
        );
        let surrogates_run = null.len();

        // One-sided corrected p-value: the observed cluster competes with
        // the maximum mass of every surrogate. The +1 terms keep p
        // strictly positive even when no surrogate reaches the observed
        // mass.
        let p_values: Vec<f64> = clusters
            .iter()
            .map(|c| {
                let exceed = null.iter().filter(|&&m| m >= c.mass.abs()).count();
                (exceed + 1) as f64 / (surrogates_run + 1) as f64
            })
            .collect();
        let significant: Vec<bool> = p_values.iter().map(|&p| p < alpha).collect();

        let statistic = stat.into_shape_with_order(IxDyn(&self.stat_shape)).unwrap();

        ClusterSearchResult {
            statistic,
            clusters,
            p_values,
            significant,
            null_distribution: null,
            surrogates_run,
        }
    }
}

/// Reshape a validated condition array to (samples, channels, trials).
///
/// 2-D input becomes a single channel; for higher ranks every axis
/// between samples and trials folds into the channel axis.
fn canonical(arr: ArrayD<f64>) -> Array3<f64> {
    let ndim = arr.ndim();
    let samples = arr.shape()[0];
    let trials = arr.shape()[ndim - 1];
    let channels: usize = arr.shape()[1..ndim - 1].iter().product();
    let flat: Vec<f64> = arr.into_iter().collect();
    Array3::from_shape_vec((samples, channels, trials), flat).unwrap()
}

/// Everything a caller needs for reporting and plotting.
///
/// Field order mirrors the result-tuple layout that plotting layers
/// consume: statistic, clusters, p-values, flags, null distribution.
#[derive(Debug, Clone)]
pub struct ClusterSearchResult {
    /// Pointwise t statistic, shaped like one input array without its
    /// trial axis (1-D for 2-D input, 2-D for 3-D input).
    pub statistic: ArrayD<f64>,
    /// Every suprathreshold cluster of the observed statistic, ascending
    /// by start index within each channel.
    pub clusters: Vec<Cluster>,
    /// Corrected p-value per cluster, parallel to `clusters`.
    pub p_values: Vec<f64>,
    /// `p < alpha` per cluster, parallel to `clusters`.
    pub significant: Vec<bool>,
    /// Maximum cluster mass of each completed surrogate.
    pub null_distribution: Vec<f64>,
    /// Surrogates that actually ran; smaller than the configured count
    /// only when a [`CancelToken`] fired.
    pub surrogates_run: usize,
}

impl ClusterSearchResult {
    /// Masses of the observed clusters, parallel to `clusters`.
    pub fn masses(&self) -> Vec<f64> {
        self.clusters.iter().map(|c| c.mass).collect()
    }

    /// The clusters that survived the alpha cutoff.
    pub fn significant_clusters(&self) -> Vec<&Cluster> {
        self.clusters
            .iter()
            .zip(&self.significant)
            .filter_map(|(c, &sig)| sig.then_some(c))
            .collect()
    }

    /// Smallest surrogate maximum mass, 0.0 for an empty null
    /// distribution. A healthy null on noisy data stays clearly above
    /// zero; a value at 0 means whole surrogates found no cluster at all.
    pub fn null_min(&self) -> f64 {
        if self.null_distribution.is_empty() {
            return 0.0;
        }
        self.null_distribution
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Dimension, IxDyn};

    fn pseudo_noise(shape: &[usize], phase: u64) -> ArrayD<f64> {
        ArrayD::from_shape_fn(IxDyn(shape), |ix| {
            let mut acc = phase as f64 * 0.61;
            for (d, &i) in ix.slice().iter().enumerate() {
                acc += (i * (2 * d + 3)) as f64;
            }
            acc.sin() + (acc * 1.7).cos() * 0.5
        })
    }

    #[test]
    fn statistic_keeps_input_rank() {
        let cfg = SearchConfig {
            num_surrogates: 10,
            seed: Some(1),
            ..SearchConfig::default()
        };

        let flat = ClusterSearch::new(
            vec![pseudo_noise(&[40, 8], 1), pseudo_noise(&[40, 8], 2)],
            cfg.clone(),
        )
        .unwrap()
        .search(0.05);
        assert_eq!(flat.statistic.shape(), &[40]);

        let chans = ClusterSearch::new(
            vec![pseudo_noise(&[40, 3, 8], 1), pseudo_noise(&[40, 3, 8], 2)],
            cfg,
        )
        .unwrap()
        .search(0.05);
        assert_eq!(chans.statistic.shape(), &[40, 3]);
    }

    #[test]
    fn clusters_are_tagged_with_their_channel() {
        // Channel 0 carries a strong offset over samples 2..4, channel 1
        // is identical between conditions.
        let mut a = pseudo_noise(&[6, 2, 8], 5);
        let b = pseudo_noise(&[6, 2, 8], 5);
        for s in 2..4 {
            for tr in 0..8 {
                a[[s, 0, tr]] += 50.0;
            }
        }
        let cfg = SearchConfig {
            num_surrogates: 20,
            threshold: 5.0,
            seed: Some(2),
        };
        let result = ClusterSearch::new(vec![a, b], cfg).unwrap().search(0.05);
        assert_eq!(result.clusters.len(), 1);
        let c = &result.clusters[0];
        assert_eq!((c.start, c.end, c.channel), (2, 4, 0));
        assert!(c.mass > 0.0);
    }

    #[test]
    fn cancelled_search_reports_truncation() {
        let data = vec![pseudo_noise(&[30, 10], 1), pseudo_noise(&[30, 10], 2)];
        let cfg = SearchConfig {
            num_surrogates: 40,
            seed: Some(3),
            ..SearchConfig::default()
        };
        let engine = ClusterSearch::new(data, cfg).unwrap();

        let token = CancelToken::new();
        token.cancel();
        let result = engine.search_with_cancel(0.05, &token);
        assert_eq!(result.surrogates_run, 0);
        assert!(result.null_distribution.is_empty());
        assert_eq!(result.null_min(), 0.0);
        // The observed pass still ran.
        assert_eq!(result.statistic.shape(), &[30]);
    }
}

//! Search configuration.
//!
//! [`SearchConfig`] holds every tunable parameter of a cluster search.
//! All fields have documented defaults that work for typical multi-trial
//! EEG comparisons.

/// Significance level used when a caller has no reason to pick another.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Configuration for a cluster-based permutation search.
///
/// All fields are `pub` so you can construct one with struct-update
/// syntax:
///
/// ```
/// use permclust::SearchConfig;
///
/// let cfg = SearchConfig {
///     num_surrogates: 200,   // coarser p-values, faster search
///     seed: Some(42),        // reproducible permutations
///     ..SearchConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of label-shuffling surrogates used to build the null
    /// distribution of maximum cluster mass.
    ///
    /// The smallest attainable corrected p-value is
    /// `1 / (num_surrogates + 1)`, so 1000 surrogates resolve p-values
    /// down to ≈ 0.001. Must be at least 1.
    ///
    /// Default: `1000`.
    pub num_surrogates: usize,

    /// Cluster-forming threshold on the pointwise t statistic.
    ///
    /// Samples with `t > threshold` seed positive clusters, samples with
    /// `t < -threshold` negative ones. The default sits near the
    /// two-sided 5% point of the t distribution at moderate degrees of
    /// freedom; designs with very few trials per condition should pick a
    /// threshold matched to their trial counts.
    ///
    /// Default: `2.0`.
    pub threshold: f64,

    /// Seed for the permutation stream.
    ///
    /// `Some(seed)` makes every [`search`](crate::ClusterSearch::search)
    /// call on the engine bitwise reproducible. `None` draws a fresh seed
    /// from the thread generator at construction, so repeated calls on
    /// one engine still agree with each other.
    ///
    /// Default: `None`.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    /// 1000 surrogates · threshold 2.0 · entropy seed.
    fn default() -> Self {
        Self {
            num_surrogates: 1000,
            threshold: 2.0,
            seed: None,
        }
    }
}

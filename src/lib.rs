//! # permclust — cluster-based permutation statistics for EEG epochs
//!
//! `permclust` compares two conditions of multi-trial time series (EEG
//! epochs, or any sampled signal) with the cluster-based permutation
//! test: a pointwise t statistic, contiguous suprathreshold clusters,
//! and a label-shuffling null distribution of maximum cluster mass that
//! corrects p-values across all samples (and channels) jointly.
//!
//! ## Procedure overview
//!
//! ```text
//! [cond_a, cond_b]                    (samples × trials, or
//!   │                                  samples × channels × trials)
//!   ├─ t_statistic()        Welch t per sample/channel
//!   ├─ find_clusters()      contiguous runs beyond ±threshold, signed mass
//!   ├─ surrogates           shuffle pooled trial labels, num_surrogates ×
//!   │                         (t_statistic + find_clusters → max |mass|)
//!   └─ p-values             (count(null ≥ |mass|) + 1) / (N + 1),
//!        │                    flag clusters with p < alpha
//!        └─→ ClusterSearchResult
//! ```
//!
//! ## Quick start
//!
//! ```
//! use permclust::{ClusterSearch, SearchConfig, DEFAULT_ALPHA};
//! use ndarray::{ArrayD, IxDyn};
//!
//! // Two conditions: 100 samples × 12 trials each. Real callers slice
//! // these out of their recordings; any (samples, trials) f64 array works.
//! let cond_a = ArrayD::from_shape_fn(IxDyn(&[100, 12]), |ix| {
//!     ((ix[0] * 7 + ix[1] * 13) as f64).sin()
//! });
//! let cond_b = ArrayD::from_shape_fn(IxDyn(&[100, 12]), |ix| {
//!     ((ix[0] * 11 + ix[1] * 5) as f64).cos()
//! });
//!
//! let cfg = SearchConfig {
//!     num_surrogates: 100,
//!     seed: Some(1),          // reproducible permutations
//!     ..SearchConfig::default()
//! };
//! let engine = ClusterSearch::new(vec![cond_a, cond_b], cfg).unwrap();
//! let result = engine.search(DEFAULT_ALPHA);
//!
//! assert_eq!(result.null_distribution.len(), 100);
//! for (cluster, p) in result.clusters.iter().zip(&result.p_values) {
//!     println!("[{}, {}) mass {:.2} p {:.3}", cluster.start, cluster.end, cluster.mass, p);
//! }
//! ```
//!
//! ## Feeding the engine
//!
//! The engine never touches files itself. Implement [`ConditionSource`]
//! for whatever holds your epochs (an in-memory pair already does), or
//! use [`ConditionFile`] to pull two named tensors from a safetensors
//! export:
//!
//! ```no_run
//! use permclust::{ClusterSearch, ConditionFile, SearchConfig};
//!
//! let source = ConditionFile {
//!     path: "epochs.safetensors".into(),
//!     names: ["standard".into(), "deviant".into()],
//! };
//! let engine = ClusterSearch::from_source(&source, SearchConfig::default()).unwrap();
//! let result = engine.search(0.05);
//! println!("{} significant clusters", result.significant_clusters().len());
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod io;
pub mod search;
pub mod source;
pub mod stat;
pub mod surrogate;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `permclust::Foo` without having to know the internal module layout.

// cluster
pub use cluster::{find_clusters, max_cluster_mass, Cluster, Sign};

// config
pub use config::{SearchConfig, DEFAULT_ALPHA};

// error
pub use error::InputError;

// io — safetensors helpers
pub use io::{load_conditions, write_result, StWriter};

// search
pub use search::{ClusterSearch, ClusterSearchResult};

// source
pub use source::{ConditionFile, ConditionSource};

// stat
pub use stat::t_statistic;

// surrogate
pub use surrogate::CancelToken;

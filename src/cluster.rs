//! Suprathreshold cluster detection along the sample axis.
//!
//! A cluster is a maximal contiguous run of samples whose statistic lies
//! beyond the cluster-forming threshold on one side. Index convention:
//! `start` inclusive, `end` exclusive, so `end - start` is the run
//! length. Runs touching an array boundary and runs of length 1 are
//! ordinary clusters.
use ndarray::{s, ArrayView1};

/// Direction of a cluster relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Statistic above `+threshold` (first condition larger).
    Positive,
    /// Statistic below `-threshold` (second condition larger).
    Negative,
}

/// A contiguous suprathreshold run of samples on one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// First sample index of the run (inclusive).
    pub start: usize,
    /// One past the last sample index of the run (exclusive).
    pub end: usize,
    /// Channel the run lives on (0 for single-channel data).
    pub channel: usize,
    /// Signed sum of the statistic over the run.
    pub mass: f64,
    /// Side of the threshold the run exceeds.
    pub sign: Sign,
}

impl Cluster {
    /// Number of samples in the run.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True only for the degenerate zero-length run, which
    /// [`find_clusters`] never produces.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Find every suprathreshold cluster in one statistic trace.
///
/// Both directions are scanned: samples with `stat > threshold` form
/// positive runs, samples with `stat < -threshold` negative ones. A
/// positive run directly followed by a negative run (or vice versa) is
/// split at the sign change. Returned clusters are ordered by ascending
/// `start`. An empty trace, or one with no sample beyond the threshold,
/// yields an empty list.
pub fn find_clusters(stat: ArrayView1<'_, f64>, threshold: f64, channel: usize) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut run: Option<(usize, Sign)> = None;

    for (i, &v) in stat.iter().enumerate() {
        let side = if v > threshold {
            Some(Sign::Positive)
        } else if v < -threshold {
            Some(Sign::Negative)
        } else {
            None
        };
        match (run, side) {
            (None, Some(sign)) => run = Some((i, sign)),
            (Some((start, sign)), cur) if cur != Some(sign) => {
                clusters.push(close_run(stat, start, i, channel, sign));
                run = cur.map(|c| (i, c));
            }
            _ => {}
        }
    }
    if let Some((start, sign)) = run {
        clusters.push(close_run(stat, start, stat.len(), channel, sign));
    }
    clusters
}

fn close_run(
    stat: ArrayView1<'_, f64>,
    start: usize,
    end: usize,
    channel: usize,
    sign: Sign,
) -> Cluster {
    let mass = stat.slice(s![start..end]).sum();
    Cluster {
        start,
        end,
        channel,
        mass,
        sign,
    }
}

/// Largest absolute cluster mass, 0.0 when there are no clusters.
pub fn max_cluster_mass(clusters: &[Cluster]) -> f64 {
    clusters
        .iter()
        .map(|c| c.mass.abs())
        .fold(0.0_f64, f64::max)
}

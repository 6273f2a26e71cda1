//! Pointwise two-sample statistic.
//!
//! Compares two groups of observations lane-by-lane along an arbitrary
//! trial axis: Welch's t, the mean difference scaled by the combined
//! standard error. One statistic per sample (and per channel if present);
//! positive sign means the first group is larger.
use ndarray::{Array, ArrayView, ArrayView1, Axis, Dimension, RemoveAxis, Zip};

/// Welch two-sample t statistic along `axis`.
///
/// `a` and `b` must agree on every axis except `axis`; their lengths
/// along `axis` (the trial counts) may differ. Shapes are validated once
/// at engine construction, so this only debug-asserts them.
///
/// Lanes without any within-group variability produce a statistic of
/// `0.0` rather than an infinity or NaN — all-equal data is a regular
/// no-evidence result.
pub fn t_statistic<D>(
    a: ArrayView<'_, f64, D>,
    b: ArrayView<'_, f64, D>,
    axis: Axis,
) -> Array<f64, D::Smaller>
where
    D: Dimension + RemoveAxis,
{
    let n_a = a.len_of(axis);
    let n_b = b.len_of(axis);
    debug_assert!(n_a >= 1 && n_b >= 1, "empty trial axis");

    let mean_a = a.mean_axis(axis).unwrap();
    let mean_b = b.mean_axis(axis).unwrap();
    let var_a = sample_var_axis(&a, axis);
    let var_b = sample_var_axis(&b, axis);
    debug_assert_eq!(mean_a.shape(), mean_b.shape(), "lane shapes differ");

    let mut t = Array::zeros(mean_a.raw_dim());
    Zip::from(&mut t)
        .and(&mean_a)
        .and(&var_a)
        .and(&mean_b)
        .and(&var_b)
        .for_each(|t, &ma, &va, &mb, &vb| {
            let se = (va / n_a as f64 + vb / n_b as f64).sqrt();
            *t = if se > 0.0 { (ma - mb) / se } else { 0.0 };
        });
    t
}

/// Sample variance (ddof = 1) along `axis`; single-element lanes get 0.
fn sample_var_axis<D>(x: &ArrayView<'_, f64, D>, axis: Axis) -> Array<f64, D::Smaller>
where
    D: Dimension + RemoveAxis,
{
    x.map_axis(axis, lane_var)
}

fn lane_var(lane: ArrayView1<'_, f64>) -> f64 {
    let n = lane.len();
    if n < 2 {
        return 0.0;
    }
    let mean = lane.sum() / n as f64;
    let ss: f64 = lane.iter().map(|&v| (v - mean) * (v - mean)).sum();
    ss / (n - 1) as f64
}

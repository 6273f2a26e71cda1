mod common;
use common::{bump_pair, noise_pair};
use ndarray::{ArrayD, IxDyn};
use permclust::{ClusterSearch, InputError, SearchConfig};

/// One Hann bump injected into condition A over samples 40..60: the
/// search reports exactly one significant cluster, inside the bump's
/// support (start after 40, exclusive end before 60).
#[test]
fn bump_data_yields_one_cluster_inside_its_support() {
    let data = bump_pair(0xC1A5, 4.0);
    let cfg = SearchConfig {
        num_surrogates: 200,
        threshold: 2.5,
        seed: Some(7),
    };
    let result = ClusterSearch::new(data, cfg).unwrap().search(0.01);

    let sig = result.significant_clusters();
    assert_eq!(sig.len(), 1, "significant: {sig:?}\nall: {:?}", result.clusters);
    let c = sig[0];
    assert!(c.start > 40, "cluster starts at {}", c.start);
    assert!(c.end < 60, "cluster ends at {}", c.end);
    assert!(c.mass > 0.0, "bump cluster should be positive, mass {}", c.mass);
}

/// Pure noise: nothing survives the correction, and the null
/// distribution of maximum masses stays clearly off zero.
#[test]
fn noise_data_yields_no_significant_cluster() {
    let data = noise_pair(0x5EED);
    let cfg = SearchConfig {
        num_surrogates: 100,
        threshold: 1.5,
        seed: Some(3),
    };
    let result = ClusterSearch::new(data, cfg).unwrap().search(0.01);

    assert!(
        result.significant_clusters().is_empty(),
        "false positives: {:?}",
        result.significant_clusters()
    );
    assert!(result.null_min() > 0.01, "null min = {}", result.null_min());
}

#[test]
fn single_array_is_rejected() {
    let data = vec![ArrayD::zeros(IxDyn(&[100, 15]))];
    let err = ClusterSearch::new(data, SearchConfig::default()).unwrap_err();
    assert_eq!(err, InputError::ConditionCount(1));
}

#[test]
fn three_arrays_are_rejected() {
    let data = vec![ArrayD::zeros(IxDyn(&[100, 15])); 3];
    let err = ClusterSearch::new(data, SearchConfig::default()).unwrap_err();
    assert_eq!(err, InputError::ConditionCount(3));
}

#[test]
fn one_dimensional_arrays_are_rejected() {
    // Missing trial axis: a single trace per condition.
    let data = vec![ArrayD::zeros(IxDyn(&[100])); 2];
    let err = ClusterSearch::new(data, SearchConfig::default()).unwrap_err();
    assert_eq!(err, InputError::MissingTrialAxis(1));
}

#[test]
fn zero_surrogates_are_rejected() {
    let cfg = SearchConfig {
        num_surrogates: 0,
        ..SearchConfig::default()
    };
    let err = ClusterSearch::new(noise_pair(1), cfg).unwrap_err();
    assert_eq!(err, InputError::NoSurrogates);
}

#[test]
fn empty_trial_axis_is_rejected() {
    let data = vec![
        ArrayD::zeros(IxDyn(&[100, 15])),
        ArrayD::zeros(IxDyn(&[100, 0])),
    ];
    let err = ClusterSearch::new(data, SearchConfig::default()).unwrap_err();
    assert_eq!(err, InputError::NoTrials(1));
}

#[test]
fn mismatched_sample_axes_are_rejected() {
    let data = vec![
        ArrayD::zeros(IxDyn(&[100, 15])),
        ArrayD::zeros(IxDyn(&[90, 15])),
    ];
    let err = ClusterSearch::new(data, SearchConfig::default()).unwrap_err();
    assert!(matches!(err, InputError::ShapeMismatch { .. }), "{err:?}");
}

/// Trial counts may differ between the conditions; only the lane shape
/// has to agree.
#[test]
fn unequal_trial_counts_are_fine() {
    let data = vec![
        noise_pair(11).swap_remove(0),
        ArrayD::from_shape_fn(IxDyn(&[common::N_SAMPLES, 9]), |ix| {
            ((ix[0] * 3 + ix[1] * 5) as f64).sin()
        }),
    ];
    let cfg = SearchConfig {
        num_surrogates: 50,
        seed: Some(5),
        ..SearchConfig::default()
    };
    let result = ClusterSearch::new(data, cfg).unwrap().search(0.05);
    assert_eq!(result.surrogates_run, 50);
}

/// Same data, same seed → bitwise identical clusters, masses, p-values
/// and null distribution, across calls and across engines.
#[test]
fn same_seed_reproduces_the_search() {
    let cfg = SearchConfig {
        num_surrogates: 100,
        threshold: 1.5,
        seed: Some(0xDECADE),
    };

    let engine = ClusterSearch::new(bump_pair(21, 4.0), cfg.clone()).unwrap();
    let r1 = engine.search(0.05);
    let r2 = engine.search(0.05);
    let r3 = ClusterSearch::new(bump_pair(21, 4.0), cfg).unwrap().search(0.05);

    for other in [&r2, &r3] {
        assert_eq!(r1.clusters, other.clusters);
        assert_eq!(r1.masses(), other.masses());
        assert_eq!(r1.p_values, other.p_values);
        assert_eq!(r1.significant, other.significant);
        assert_eq!(r1.null_distribution, other.null_distribution);
    }
}

/// Corrected p-values never reach 0 or 1 on data with a healthy null
/// distribution, and tie handling is one-sided (null value equal to the
/// observed mass counts against the cluster).
#[test]
fn p_values_stay_inside_the_open_interval() {
    let data = bump_pair(0xBEEF, 4.0);
    let cfg = SearchConfig {
        num_surrogates: 200,
        threshold: 2.5,
        seed: Some(9),
    };
    let result = ClusterSearch::new(data, cfg).unwrap().search(0.05);

    assert!(!result.clusters.is_empty());
    for &p in &result.p_values {
        assert!(p > 0.0 && p < 1.0, "p = {p}");
    }
    // Smallest attainable p with 200 surrogates is 1/201.
    let p_min = result.p_values.iter().cloned().fold(f64::INFINITY, f64::min);
    assert!(p_min >= 1.0 / 201.0);
}

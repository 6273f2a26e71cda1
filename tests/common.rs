/// Shared helpers: seeded synthetic condition pairs.
use ndarray::{ArrayD, IxDyn};
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

#[allow(unused)]
pub const N_SAMPLES: usize = 100;
#[allow(unused)]
pub const N_TRIALS: usize = 15;

/// Two independent Gaussian-noise conditions, (samples × trials).
#[allow(unused)]
pub fn noise_pair(seed: u64) -> Vec<ArrayD<f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let a = ArrayD::from_shape_fn(IxDyn(&[N_SAMPLES, N_TRIALS]), |_| {
        StandardNormal.sample(&mut rng)
    });
    let b = ArrayD::from_shape_fn(IxDyn(&[N_SAMPLES, N_TRIALS]), |_| {
        StandardNormal.sample(&mut rng)
    });
    vec![a, b]
}

/// `noise_pair` with a Hann bump of height `amplitude` added to every
/// trial of the first condition over samples 40..60.
#[allow(unused)]
pub fn bump_pair(seed: u64, amplitude: f64) -> Vec<ArrayD<f64>> {
    let mut data = noise_pair(seed);
    let win = hann(20);
    for (s, &w) in win.iter().enumerate() {
        for tr in 0..N_TRIALS {
            data[0][[40 + s, tr]] += amplitude * w;
        }
    }
    data
}

/// Symmetric Hann window of length `n`, zero at both endpoints.
#[allow(unused)]
pub fn hann(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64 / (n - 1) as f64;
            0.5 * (1.0 - (2.0 * std::f64::consts::PI * x).cos())
        })
        .collect()
}

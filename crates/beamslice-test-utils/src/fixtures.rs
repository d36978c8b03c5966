//! Reusable particle populations.
//!
//! Every random fixture is driven by a `ChaCha8Rng` seeded from the
//! caller's `seed`, so identical seeds give bit-identical populations.
//!
//! - [`evenly_spaced`] / [`evenly_spaced_bunch`]: deterministic midpoint grid.
//! - [`uniform`] / [`uniform_bunch`]: uniform longitudinal spread.
//! - [`gaussian`] / [`gaussian_bunch`]: Gaussian in all six channels.

use beamslice_core::physics::M_P;
use beamslice_core::{BeamParams, Channel};
use beamslice_ledger::Bunch;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Transverse rms size used by the bunch fixtures, m.
pub const SIGMA_TRANSVERSE: f64 = 1e-3;

/// Transverse rms angle used by the bunch fixtures, rad.
pub const SIGMA_ANGLE: f64 = 1e-4;

/// Relative momentum spread used by the bunch fixtures.
pub const SIGMA_DP: f64 = 1e-3;

/// A 26 GeV/c proton beam.
pub fn proton_beam() -> BeamParams {
    BeamParams::from_gamma(M_P, 27.7).expect("valid fixture beam")
}

/// `n` points at the midpoints of `n` equal cells spanning `[lo, hi]`.
pub fn evenly_spaced(n: usize, lo: f64, hi: f64) -> Vec<f64> {
    let step = (hi - lo) / n as f64;
    (0..n).map(|i| lo + step * (i as f64 + 0.5)).collect()
}

/// `n` samples uniform on `[lo, hi)`.
pub fn uniform(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| lo + (hi - lo) * rng.random::<f64>()).collect()
}

/// `n` samples from `N(mean, sigma^2)`.
pub fn gaussian(n: usize, mean: f64, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| mean + sigma * box_muller(&mut rng)).collect()
}

/// Standard normal sample via the Box-Muller transform.
fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Bunch whose longitudinal coordinates are [`evenly_spaced`] in `[lo, hi]`.
pub fn evenly_spaced_bunch(n: usize, lo: f64, hi: f64) -> Bunch {
    Bunch::longitudinal(evenly_spaced(n, lo, hi), proton_beam())
}

/// Bunch with `dz` uniform on `[lo, hi)` and Gaussian transverse and
/// momentum coordinates.
pub fn uniform_bunch(n: usize, lo: f64, hi: f64, seed: u64) -> Bunch {
    let dz = uniform(n, lo, hi, seed);
    with_gaussian_transverse(dz, seed)
}

/// Bunch that is Gaussian in every channel, with rms bunch length `sigma_z`
/// centred on zero.
pub fn gaussian_bunch(n: usize, sigma_z: f64, seed: u64) -> Bunch {
    let dz = gaussian(n, 0.0, sigma_z, seed);
    with_gaussian_transverse(dz, seed)
}

/// Bunch in which every particle sits at the same longitudinal coordinate.
pub fn constant_bunch(n: usize, dz: f64) -> Bunch {
    Bunch::longitudinal(vec![dz; n], proton_beam())
}

fn with_gaussian_transverse(dz: Vec<f64>, seed: u64) -> Bunch {
    let n = dz.len();
    // Distinct streams per channel so no two channels are correlated.
    let channel = |k: u64, sigma: f64| gaussian(n, 0.0, sigma, seed.wrapping_add(k + 1));
    let mut coords: [Vec<f64>; Channel::COUNT] = Default::default();
    coords[Channel::X.index()] = channel(1, SIGMA_TRANSVERSE);
    coords[Channel::Xp.index()] = channel(2, SIGMA_ANGLE);
    coords[Channel::Y.index()] = channel(3, SIGMA_TRANSVERSE);
    coords[Channel::Yp.index()] = channel(4, SIGMA_ANGLE);
    coords[Channel::Dz.index()] = dz;
    coords[Channel::Dp.index()] = channel(5, SIGMA_DP);
    Bunch::from_channels(coords, proton_beam()).expect("fixture channels share a length")
}

/// Population mean.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

//! Per-slice statistical moments.
//!
//! Means and standard deviations are population moments (denominator `n`)
//! accumulated with Welford's update, so a run of identical coordinates
//! yields exactly zero spread. Emittances follow the usual rms definitions:
//!
//! - transverse: `εn = βγ · sqrt(<Δu²><Δu'²> - <Δu Δu'>²) · 1e6` (mm·mrad)
//! - longitudinal: `εz = 4π · σ_dz · σ_dp · m γ β c / e` (eV·s)
//!
//! An empty slice reports zero for every quantity.

use std::f64::consts::PI;
use std::ops::Range;

use beamslice_core::physics::{C, E};
use beamslice_core::{BeamParams, Channel, ParticleLedger, SliceError};

/// Scale from m·rad to mm·mrad for the transverse emittances.
pub const TRANSVERSE_EMITTANCE_SCALE: f64 = 1e6;

// ── Accumulators ──────────────────────────────────────────────────

/// Single-channel running mean and variance.
#[derive(Clone, Debug, Default)]
pub struct Welford {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Welford {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Number of samples seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean; 0 when empty.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation; 0 when empty.
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).max(0.0).sqrt()
    }
}

/// Running first and second moments of a coordinate pair `(u, v)`,
/// including the co-moment needed for emittance.
#[derive(Clone, Debug, Default)]
struct PlaneAccumulator {
    count: usize,
    mean_u: f64,
    mean_v: f64,
    m2_u: f64,
    m2_v: f64,
    c_uv: f64,
}

impl PlaneAccumulator {
    fn update(&mut self, u: f64, v: f64) {
        self.count += 1;
        let n = self.count as f64;
        let du = u - self.mean_u;
        let dv = v - self.mean_v;
        self.mean_u += du / n;
        self.mean_v += dv / n;
        self.m2_u += du * (u - self.mean_u);
        self.m2_v += dv * (v - self.mean_v);
        self.c_uv += du * (v - self.mean_v);
    }

    fn var_u(&self) -> f64 {
        self.normalised(self.m2_u).max(0.0)
    }

    fn var_v(&self) -> f64 {
        self.normalised(self.m2_v).max(0.0)
    }

    fn cov(&self) -> f64 {
        self.normalised(self.c_uv)
    }

    fn normalised(&self, m: f64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            m / self.count as f64
        }
    }

    /// Geometric rms emittance; rounding can push the radicand slightly
    /// negative for perfectly correlated pairs, which reads as zero.
    fn emittance(&self) -> f64 {
        let cov = self.cov();
        (self.var_u() * self.var_v() - cov * cov).max(0.0).sqrt()
    }
}

// ── Phase-space planes ────────────────────────────────────────────

/// A phase-space plane: a position channel and its conjugate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Plane {
    /// `(x, xp)`.
    Horizontal,
    /// `(y, yp)`.
    Vertical,
    /// `(dz, dp)`.
    Longitudinal,
}

impl Plane {
    /// All planes.
    pub const ALL: [Plane; 3] = [Plane::Horizontal, Plane::Vertical, Plane::Longitudinal];

    /// The `(position, conjugate)` channel pair of this plane.
    pub const fn channels(self) -> (Channel, Channel) {
        match self {
            Self::Horizontal => (Channel::X, Channel::Xp),
            Self::Vertical => (Channel::Y, Channel::Yp),
            Self::Longitudinal => (Channel::Dz, Channel::Dp),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

// ── SliceMoments ──────────────────────────────────────────────────

/// Per-slice means, standard deviations, and normalised emittances.
///
/// Every sequence has one entry per slice, in slice order.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceMoments {
    mean: [Vec<f64>; Channel::COUNT],
    sigma: [Vec<f64>; Channel::COUNT],
    emittance: [Vec<f64>; 3],
}

impl SliceMoments {
    fn zeroed(n_slices: usize) -> Self {
        Self {
            mean: std::array::from_fn(|_| vec![0.0; n_slices]),
            sigma: std::array::from_fn(|_| vec![0.0; n_slices]),
            emittance: std::array::from_fn(|_| vec![0.0; n_slices]),
        }
    }

    /// Number of slices.
    pub fn n_slices(&self) -> usize {
        self.mean[0].len()
    }

    /// Per-slice mean of a channel.
    pub fn mean(&self, channel: Channel) -> &[f64] {
        &self.mean[channel.index()]
    }

    /// Per-slice population standard deviation of a channel.
    pub fn sigma(&self, channel: Channel) -> &[f64] {
        &self.sigma[channel.index()]
    }

    /// Per-slice normalised emittance of a plane.
    pub fn emittance(&self, plane: Plane) -> &[f64] {
        &self.emittance[plane.index()]
    }

    /// Normalised horizontal emittance, mm·mrad.
    pub fn epsn_x(&self) -> &[f64] {
        self.emittance(Plane::Horizontal)
    }

    /// Normalised vertical emittance, mm·mrad.
    pub fn epsn_y(&self) -> &[f64] {
        self.emittance(Plane::Vertical)
    }

    /// Longitudinal emittance, eV·s.
    pub fn epsn_z(&self) -> &[f64] {
        self.emittance(Plane::Longitudinal)
    }
}

/// Compute moments over `ranges`, one index range per slice into the
/// sorted alive prefix of `ledger`.
///
/// # Errors
///
/// Returns [`SliceError::LedgerMismatch`] if any range reaches past the
/// ledger's alive particles.
pub fn compute_moments<L>(ledger: &L, ranges: &[Range<usize>]) -> Result<SliceMoments, SliceError>
where
    L: ParticleLedger + ?Sized,
{
    let n_alive = ledger.n_alive();
    if let Some(end) = ranges.iter().map(|r| r.end).max().filter(|&end| end > n_alive) {
        return Err(SliceError::LedgerMismatch {
            expected: end,
            actual: n_alive,
        });
    }

    let beam = ledger.beam();
    let mut out = SliceMoments::zeroed(ranges.len());
    for (slice, range) in ranges.iter().enumerate() {
        if range.is_empty() {
            continue;
        }
        for plane in Plane::ALL {
            let (pos, conj) = plane.channels();
            let u = &ledger.coords(pos)[range.clone()];
            let v = &ledger.coords(conj)[range.clone()];
            let mut acc = PlaneAccumulator::default();
            u.iter().zip(v).for_each(|(&a, &b)| acc.update(a, b));

            out.mean[pos.index()][slice] = acc.mean_u;
            out.mean[conj.index()][slice] = acc.mean_v;
            out.sigma[pos.index()][slice] = acc.var_u().sqrt();
            out.sigma[conj.index()][slice] = acc.var_v().sqrt();
            out.emittance[plane.index()][slice] = match plane {
                Plane::Horizontal | Plane::Vertical => {
                    transverse_emittance(acc.emittance(), beam)
                }
                Plane::Longitudinal => {
                    longitudinal_emittance(acc.var_u().sqrt(), acc.var_v().sqrt(), beam)
                }
            };
        }
    }
    Ok(out)
}

fn transverse_emittance(geometric: f64, beam: &BeamParams) -> f64 {
    geometric * beam.beta_gamma() * TRANSVERSE_EMITTANCE_SCALE
}

fn longitudinal_emittance(sigma_dz: f64, sigma_dp: f64, beam: &BeamParams) -> f64 {
    4.0 * PI * sigma_dz * sigma_dp * beam.mass() * beam.gamma() * beam.beta() * C / E
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamslice_core::physics::M_P;
    use beamslice_ledger::Bunch;

    fn beam() -> BeamParams {
        BeamParams::from_gamma(M_P, 27.7).unwrap()
    }

    fn bunch(coords: [Vec<f64>; Channel::COUNT]) -> Bunch {
        Bunch::from_channels(coords, beam()).unwrap()
    }

    #[test]
    fn welford_matches_two_pass() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut acc = Welford::new();
        data.iter().for_each(|&v| acc.update(v));
        assert_eq!(acc.count(), 8);
        assert!((acc.mean() - 5.0).abs() < 1e-15);
        assert!((acc.std_dev() - 2.0).abs() < 1e-15);
    }

    #[test]
    fn welford_empty_is_zero() {
        let acc = Welford::new();
        assert_eq!(acc.mean(), 0.0);
        assert_eq!(acc.std_dev(), 0.0);
    }

    #[test]
    fn identical_coordinates_have_exactly_zero_spread() {
        let n = 7;
        let b = bunch([
            vec![0.1; n],
            vec![0.3; n],
            vec![-0.2; n],
            vec![1e-4; n],
            vec![0.7; n],
            vec![1e-3; n],
        ]);
        let m = compute_moments(&b, &[0..n]).unwrap();
        for ch in Channel::ALL {
            assert_eq!(m.sigma(ch)[0], 0.0, "sigma({ch})");
        }
        assert_eq!(m.mean(Channel::X)[0], 0.1);
        assert_eq!(m.mean(Channel::Dz)[0], 0.7);
        for plane in Plane::ALL {
            assert_eq!(m.emittance(plane)[0], 0.0);
        }
    }

    #[test]
    fn empty_slice_is_all_zero() {
        let b = bunch(std::array::from_fn(|k| vec![k as f64 + 1.0, k as f64 + 2.0]));
        let m = compute_moments(&b, &[0..0, 0..2, 2..2]).unwrap();
        for ch in Channel::ALL {
            assert_eq!(m.mean(ch)[0], 0.0);
            assert_eq!(m.sigma(ch)[0], 0.0);
            assert_eq!(m.mean(ch)[2], 0.0);
        }
        assert_eq!(m.epsn_x()[0], 0.0);
        assert_eq!(m.epsn_y()[2], 0.0);
        assert_eq!(m.epsn_z()[0], 0.0);
        assert!((m.mean(Channel::Dz)[1] - 5.5).abs() < 1e-15);
    }

    #[test]
    fn transverse_emittance_of_uncorrelated_square() {
        // x in {-1, 1}, xp in {-1, 1}, all four combinations: <x²>=<xp²>=1, <x xp>=0.
        let x = vec![-1.0, -1.0, 1.0, 1.0];
        let xp = vec![-1.0, 1.0, -1.0, 1.0];
        let zeros = vec![0.0; 4];
        let b = bunch([x, xp, zeros.clone(), zeros.clone(), zeros.clone(), zeros]);
        let m = compute_moments(&b, &[0..4]).unwrap();
        let expected = beam().beta_gamma() * TRANSVERSE_EMITTANCE_SCALE;
        assert!((m.epsn_x()[0] - expected).abs() < 1e-9 * expected);
        assert_eq!(m.epsn_y()[0], 0.0);
    }

    #[test]
    fn perfectly_correlated_plane_has_zero_emittance() {
        let y: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let yp: Vec<f64> = y.iter().map(|v| 2.0 * v).collect();
        let zeros = vec![0.0; 10];
        let b = bunch([zeros.clone(), zeros.clone(), y, yp, zeros.clone(), zeros]);
        let m = compute_moments(&b, &[0..10]).unwrap();
        let scale = beam().beta_gamma() * TRANSVERSE_EMITTANCE_SCALE;
        let reference = scale * m.sigma(Channel::Y)[0] * m.sigma(Channel::Yp)[0];
        assert!(m.epsn_y()[0] < 1e-6 * reference);
    }

    #[test]
    fn longitudinal_emittance_formula() {
        let dz = vec![-1e-2, 1e-2];
        let dp = vec![-1e-3, 1e-3];
        let zeros = vec![0.0; 2];
        let b = bunch([zeros.clone(), zeros.clone(), zeros.clone(), zeros, dz, dp]);
        let m = compute_moments(&b, &[0..2]).unwrap();
        let p = beam();
        let expected = 4.0 * PI * 1e-2 * 1e-3 * p.mass() * p.gamma() * p.beta() * C / E;
        assert!((m.epsn_z()[0] - expected).abs() < 1e-12 * expected);
        assert!((m.sigma(Channel::Dz)[0] - 1e-2).abs() < 1e-15);
    }

    #[test]
    fn ranges_past_alive_particles_are_rejected() {
        let b = Bunch::longitudinal(vec![0.0; 3], beam());
        let err = compute_moments(&b, &[0..4]).unwrap_err();
        assert_eq!(
            err,
            SliceError::LedgerMismatch {
                expected: 4,
                actual: 3
            }
        );
    }
}

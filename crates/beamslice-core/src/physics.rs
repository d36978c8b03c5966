//! Physical constants and the relativistic beam parameters consumed by
//! the statistics pass.

use crate::error::SliceError;

/// Speed of light in vacuum, m/s.
pub const C: f64 = 299_792_458.0;

/// Elementary charge, C.
pub const E: f64 = 1.602_176_634e-19;

/// Proton rest mass, kg.
pub const M_P: f64 = 1.672_621_923_69e-27;

/// Rest mass and relativistic factors of the beam particles.
///
/// Supplied by the ring/RF bookkeeping upstream; the slicing engine only
/// reads them to normalise emittances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamParams {
    mass: f64,
    beta: f64,
    gamma: f64,
}

impl BeamParams {
    /// Create parameters from explicit `mass` (kg), `beta`, and `gamma`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Configuration`] if `mass` is not finite and
    /// positive, `gamma` is not finite and `>= 1`, or `beta` is outside `[0, 1)`.
    pub fn new(mass: f64, beta: f64, gamma: f64) -> Result<Self, SliceError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SliceError::configuration(format!(
                "mass must be finite and > 0, got {mass}"
            )));
        }
        if !gamma.is_finite() || gamma < 1.0 {
            return Err(SliceError::configuration(format!(
                "gamma must be finite and >= 1, got {gamma}"
            )));
        }
        if !beta.is_finite() || !(0.0..1.0).contains(&beta) {
            return Err(SliceError::configuration(format!(
                "beta must lie in [0, 1), got {beta}"
            )));
        }
        Ok(Self { mass, beta, gamma })
    }

    /// Create parameters from `mass` (kg) and `gamma`, deriving
    /// `beta = sqrt(1 - 1/gamma^2)`.
    pub fn from_gamma(mass: f64, gamma: f64) -> Result<Self, SliceError> {
        if !gamma.is_finite() || gamma < 1.0 {
            return Err(SliceError::configuration(format!(
                "gamma must be finite and >= 1, got {gamma}"
            )));
        }
        let beta = (1.0 - 1.0 / (gamma * gamma)).sqrt();
        Self::new(mass, beta, gamma)
    }

    /// Rest mass, kg.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Relativistic beta.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Relativistic gamma.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// `beta * gamma`, the transverse emittance normalisation factor.
    pub fn beta_gamma(&self) -> f64 {
        self.beta * self.gamma
    }
}

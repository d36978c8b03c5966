//! Benchmark profiles for the beamslice slicing engine.
//!
//! - [`reference_bunch`]: 100K-particle Gaussian bunch, 0.3 m rms length
//! - [`reference_config`]: 64 slices over a `±3σ` dynamic window

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use beamslice_engine::{SliceConfig, SliceMode, WindowPolicy};
use beamslice_ledger::Bunch;

/// Particles in the reference bunch.
pub const REFERENCE_PARTICLES: usize = 100_000;

/// Slices in the reference configuration.
pub const REFERENCE_SLICES: usize = 64;

/// Build the reference benchmark bunch.
pub fn reference_bunch(seed: u64) -> Bunch {
    beamslice_test_utils::gaussian_bunch(REFERENCE_PARTICLES, 0.3, seed)
}

/// Build the reference slicing configuration for `mode`.
pub fn reference_config(mode: SliceMode, seed: u64) -> SliceConfig {
    SliceConfig::new(REFERENCE_SLICES, mode)
        .with_window(WindowPolicy::Dynamic {
            n_sigma_z: Some(3.0),
        })
        .with_seed(seed)
}

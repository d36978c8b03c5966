//! beamslice: longitudinal slicing of macro-particle beams.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the beamslice sub-crates. For most users, adding `beamslice` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use beamslice::prelude::*;
//! use beamslice::types::physics::M_P;
//!
//! let beam = BeamParams::from_gamma(M_P, 27.7).unwrap();
//! let dz: Vec<f64> = (0..1000).map(|i| (i as f64 - 499.5) * 1e-3).collect();
//! let mut bunch = Bunch::longitudinal(dz, beam);
//!
//! let config = SliceConfig::new(7, SliceMode::ConstantCharge).with_seed(1);
//! let mut slices = SliceSet::new(config).unwrap();
//!
//! let moments = slices.slice_turn(&mut bunch).unwrap();
//! assert_eq!(moments.n_slices(), 7);
//!
//! let counts = slices.counts().unwrap();
//! assert_eq!(counts.iter().sum::<usize>(), 1000);
//! assert!(counts.iter().all(|&c| c == 142 || c == 143));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `beamslice-core` | Channels, beam constants, errors, the ledger trait |
//! | [`ledger`] | `beamslice-ledger` | The `Bunch` particle population |
//! | [`engine`] | `beamslice-engine` | Slice sets, partitioners, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and constants (`beamslice-core`).
///
/// Contains [`types::Channel`], [`types::BeamParams`], [`types::SliceError`],
/// and the [`types::ParticleLedger`] trait.
pub use beamslice_core as types;

/// Macro-particle storage (`beamslice-ledger`).
pub use beamslice_ledger as ledger;

/// The slicing engine (`beamslice-engine`).
///
/// [`engine::SliceSet`] drives the per-turn partition and statistics pass;
/// [`engine::partition`] and [`engine::stats`] expose the building blocks.
pub use beamslice_engine as engine;

/// Common imports for typical beamslice usage.
///
/// ```rust
/// use beamslice::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use beamslice_core::{BeamParams, Channel, ParticleLedger, SliceError, SliceState};

    // Ledger
    pub use beamslice_ledger::Bunch;

    // Engine
    pub use beamslice_engine::{
        Partition, Plane, SliceConfig, SliceMode, SliceMoments, SliceSet, Window, WindowPolicy,
    };
}

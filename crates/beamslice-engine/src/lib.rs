//! Longitudinal slicing engine for macro-particle beams.
//!
//! A [`SliceSet`] partitions the alive particles of a
//! [`ParticleLedger`](beamslice_core::ParticleLedger) into an ordered
//! sequence of longitudinal slices, then computes per-slice moments for
//! wakefield, space-charge, and feedback models downstream.
//!
//! # Modes
//!
//! - [`SliceMode::ConstantSpace`]: equal-width slices, deterministic.
//! - [`SliceMode::ConstantCharge`]: equal-count slices; the remainder is
//!   spread over a seeded random subset of slices.
//!
//! # Windows
//!
//! [`WindowPolicy::Fixed`] cut points, or a [`WindowPolicy::Dynamic`]
//! window spanning the alive extent or `mean ± n_sigma_z·σ`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod partition;
pub mod slice_set;
pub mod stats;
pub mod window;

pub use config::{SliceConfig, SliceMode, WindowPolicy};
pub use partition::Partition;
pub use slice_set::SliceSet;
pub use stats::{Plane, SliceMoments};
pub use window::Window;

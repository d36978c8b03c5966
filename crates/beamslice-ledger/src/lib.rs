//! Macro-particle storage for beamslice simulations.
//!
//! [`Bunch`] stores a population as six index-aligned coordinate arrays
//! (structure of arrays) and implements [`ParticleLedger`] so the slicing
//! engine can sort and read it. Alive particles always occupy the prefix
//! of every array; particles marked lost are moved behind them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bunch;

pub use bunch::Bunch;
pub use beamslice_core::ParticleLedger;

//! Core types and traits for the beamslice slicing engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared across the workspace: coordinate channels,
//! beam physics constants, the slice-set lifecycle states, the error
//! taxonomy, and the [`ParticleLedger`] trait through which the engine
//! reads a macro-particle population.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod error;
pub mod physics;
pub mod state;
pub mod traits;

pub use channel::Channel;
pub use error::SliceError;
pub use physics::BeamParams;
pub use state::SliceState;
pub use traits::ParticleLedger;

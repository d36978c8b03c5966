//! Test utilities for beamslice development.
//!
//! Provides seeded population fixtures (see [`fixtures`]) shared by the
//! unit tests, integration tests, and benchmarks of every crate in the
//! workspace.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;
